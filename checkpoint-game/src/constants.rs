//! Centralized balance and tuning constants for Checkpoint game logic.
//!
//! These values define the deterministic math for the core simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

// Meters -------------------------------------------------------------------
pub(crate) const METER_MIN: f32 = 0.0;
pub(crate) const METER_MAX: f32 = 100.0;
pub(crate) const STARTING_HEALTH: f32 = 100.0;
pub(crate) const CRITICAL_HEALTH: f32 = 30.0;
pub(crate) const ESCAPE_RECOVERY_HEALTH: f32 = 50.0;

// Tick -----------------------------------------------------------------------
pub(crate) const MAX_TICK_DT: f32 = 0.1;

// Subject generation ---------------------------------------------------------
pub(crate) const SLICE_ANOMALY: f32 = 0.40;
pub(crate) const SLICE_DOPPELGANGER: f32 = 0.15;
pub(crate) const SLICE_INFECTED: f32 = 0.15;
pub(crate) const SLICE_SLEEPER: f32 = 0.10;
pub(crate) const SLICE_REFUGEE: f32 = 0.10;
pub(crate) const SLICE_INSIDER: f32 = 0.10;
pub(crate) const AMBIGUOUS_ANOMALY_CHANCE: f64 = 0.5;
pub(crate) const ROBOTIC_ANOMALY_CHANCE: f64 = 0.5;
pub(crate) const ORIGIN_LIE_CHANCE: f64 = 0.5;
pub(crate) const VERBAL_SLIP_CHANCE: f64 = 0.5;
pub(crate) const STOLEN_ID_CHANCE: f64 = 0.4;
pub(crate) const PHOTO_MISMATCH_CHANCE: f64 = 0.3;
pub(crate) const BASELINE_LIMBS: u8 = 4;
pub(crate) const BASELINE_EYES: u8 = 2;
pub(crate) const BASELINE_FINGERS: u8 = 10;
pub(crate) const DEVIANT_LIMBS: [u8; 2] = [2, 6];
pub(crate) const DEVIANT_EYES_MIN: u8 = 3;
pub(crate) const DEVIANT_EYES_MAX: u8 = 5;
pub(crate) const DEVIANT_FINGERS: [u8; 2] = [8, 12];
pub(crate) const SUBJECT_AGE_MIN: u8 = 19;
pub(crate) const SUBJECT_AGE_MAX: u8 = 78;
pub(crate) const VERBAL_AGE_DRIFT_MIN: u8 = 3;
pub(crate) const VERBAL_AGE_DRIFT_MAX: u8 = 14;
pub(crate) const WALK_IN_SECONDS: f32 = 2.5;

// Adjudication ---------------------------------------------------------------
pub(crate) const WRONG_HEALTH_DAMAGE: f32 = 20.0;
pub(crate) const WRONG_HEALTH_DAMAGE_REDUCED: f32 = 10.0;
pub(crate) const WRONG_STRESS_GAIN: f32 = 20.0;
pub(crate) const WRONG_COMPROMISE_GAIN: f32 = 12.0;
pub(crate) const WRONG_CRIMINAL_STRESS_GAIN: f32 = 10.0;
pub(crate) const WRONG_CRIMINAL_COMPROMISE_GAIN: f32 = 6.0;
pub(crate) const CORRECT_STRESS_RELIEF: f32 = 3.0;
pub(crate) const CRIMINAL_APPROVE_PENALTY: i64 = 30;
pub(crate) const WRONG_DECISION_FINE: i64 = 25;
pub(crate) const DECISION_HISTORY_CAPACITY: usize = 20;
pub(crate) const JUMPSCARE_COOLDOWN_SECONDS: f32 = 8.0;

// Shift loop -----------------------------------------------------------------
pub(crate) const AUTO_APPROVE_SECONDS: f32 = 25.0;
pub(crate) const EXTRA_TIME_SECONDS: f32 = 10.0;
pub(crate) const RESOLVE_DELAY_SECONDS: f32 = 1.2;
pub(crate) const FIRST_SUBJECT_DELAY_SECONDS: f32 = 1.5;
pub(crate) const HEALTH_STRESS_DIVISOR: f32 = 50.0;
pub(crate) const COFFEE_STRESS_MULTIPLIER: f32 = 0.75;
pub(crate) const COMPROMISE_RATE: f32 = 0.15;
pub(crate) const QUESTION_STRESS_COST: f32 = 2.0;
pub(crate) const REST_STEPS: u8 = 10;
pub(crate) const REST_STEP_SECONDS: f32 = 0.3;
pub(crate) const REST_STRESS_PER_STEP: f32 = 5.0;
pub(crate) const BETTER_REST_MULTIPLIER: f32 = 1.5;
pub(crate) const REST_COMPROMISE_RELIEF: f32 = 5.0;
pub(crate) const REST_ZONE_RADIUS: f32 = 1.5;
pub(crate) const BOOTH_REST_ZONE: (f32, f32) = (-2.5, 1.5);
pub(crate) const BOOTH_HALF_WIDTH: f32 = 3.0;
pub(crate) const BOOTH_HALF_DEPTH: f32 = 2.5;
pub(crate) const OPERATOR_WALK_SPEED: f32 = 2.2;
pub(crate) const LOOK_SENSITIVITY: f32 = 0.0025;
pub(crate) const PITCH_LIMIT: f32 = 1.35;
pub(crate) const FOOTSTEP_INTERVAL_SECONDS: f32 = 0.5;
pub(crate) const EYE_HEIGHT: f32 = 1.6;

// Horror events --------------------------------------------------------------
pub(crate) const HALLUCINATION_THRESHOLD: f32 = 25.0;
pub(crate) const GHOST_ACCUSATION_THRESHOLD: f32 = 40.0;
pub(crate) const HALLUCINATION_RATE_PER_POINT: f64 = 0.0008;
pub(crate) const GHOST_RATE_PER_POINT: f64 = 0.0005;
pub(crate) const FLICKER_COMPROMISE_WEIGHT: f32 = 1.0 / 200.0;
pub(crate) const FLICKER_STRESS_WEIGHT: f32 = 1.0 / 400.0;
pub(crate) const VIGNETTE_STRESS_WEIGHT: f32 = 0.6;
pub(crate) const VIGNETTE_COMPROMISE_WEIGHT: f32 = 0.4;
pub(crate) const FLASHLIGHT_LIGHT_BONUS: f32 = 0.15;

// Escape sequence ------------------------------------------------------------
pub(crate) const ESCAPE_DURATION_SECONDS: f32 = 60.0;
pub(crate) const ESCAPE_EXTRA_TIME_SECONDS: f32 = 15.0;
pub(crate) const ESCAPE_HEAD_START_SECONDS: f32 = 5.0;
pub(crate) const ENTITY_SPEED: f32 = 3.2;
pub(crate) const SLOW_ENTITY_MULTIPLIER: f32 = 0.6;
pub(crate) const CAPTURE_RADIUS: f32 = 1.2;
pub(crate) const ENTITY_HIT_RADIUS: f32 = 0.9;
pub(crate) const STUN_RANGE: f32 = 30.0;
pub(crate) const STUN_SECONDS: f32 = 4.0;
pub(crate) const LONGER_STUN_MULTIPLIER: f32 = 1.5;
pub(crate) const STUN_COOLDOWN_SECONDS: f32 = 2.5;
pub(crate) const DOOR_CLOSE_SECONDS: f32 = 2.0;
pub(crate) const SAFE_ZONE_RADIUS: f32 = 1.5;
pub(crate) const ESCAPE_RUN_SPEED: f32 = 4.5;
pub(crate) const ESCAPE_PLAYER_SPAWN: (f32, f32) = (0.0, 0.0);
pub(crate) const ESCAPE_ENTITY_SPAWN: (f32, f32) = (0.0, -22.0);
pub(crate) const ESCAPE_SAFE_ZONE: (f32, f32) = (28.0, 6.0);
pub(crate) const ESCAPE_HALF_EXTENT: f32 = 35.0;

// Highway escape -------------------------------------------------------------
pub(crate) const HIGHWAY_TARGET_DISTANCE: f32 = 2_000.0;
pub(crate) const HIGHWAY_LANES: [f32; 5] = [-4.0, -2.0, 0.0, 2.0, 4.0];
pub(crate) const HIGHWAY_LATERAL_LIMIT: f32 = 4.5;
pub(crate) const HIGHWAY_STEER_SPEED: f32 = 6.0;
pub(crate) const HIGHWAY_BASE_SPEED: f32 = 20.0;
pub(crate) const HIGHWAY_SPEED_PER_DISTANCE: f32 = 0.02;
pub(crate) const HIGHWAY_MAX_SPEED: f32 = 60.0;
pub(crate) const HIGHWAY_SPAWN_BASE_INTERVAL: f32 = 2.0;
pub(crate) const HIGHWAY_SPAWN_MIN_INTERVAL: f32 = 0.6;
pub(crate) const HIGHWAY_SPAWN_INTERVAL_DECAY: f32 = 0.0008;
pub(crate) const HIGHWAY_BATCH_DISTANCE_STEP: f32 = 600.0;
pub(crate) const HIGHWAY_MAX_BATCH: usize = 3;
pub(crate) const HIGHWAY_SPAWN_DEPTH: f32 = 120.0;
pub(crate) const HIGHWAY_DRIFT_SPEED: f32 = 0.8;
pub(crate) const HIGHWAY_COLLISION_HALF_WIDTH: f32 = 1.0;
pub(crate) const HIGHWAY_COLLISION_HALF_DEPTH: f32 = 1.5;
pub(crate) const HIGHWAY_PANCAKE_SECONDS: f32 = 0.6;
pub(crate) const HIGHWAY_DESTROY_SECONDS: f32 = 0.4;
pub(crate) const HIGHWAY_BEHIND_DEPTH: f32 = -5.0;
pub(crate) const HIGHWAY_GUN_COOLDOWN: f32 = 0.25;
pub(crate) const HIGHWAY_HIT_BASE_RADIUS: f32 = 0.6;
pub(crate) const HIGHWAY_HIT_RADIUS_PER_DEPTH: f32 = 0.01;
pub(crate) const HIGHWAY_PANCAKE_SCORE: u32 = 150;
pub(crate) const HIGHWAY_SHOT_SCORE: u32 = 100;
pub(crate) const HIGHWAY_START_HEALTH: f32 = 100.0;

// Break room -----------------------------------------------------------------
pub(crate) const BREAK_REST_HEALTH: f32 = 25.0;
