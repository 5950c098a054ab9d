//! Corridor chase triggered when the operator's health turns critical.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::audio::SoundCue;
use crate::constants::{
    CAPTURE_RADIUS, DOOR_CLOSE_SECONDS, ENTITY_HIT_RADIUS, ENTITY_SPEED,
    ESCAPE_DURATION_SECONDS, ESCAPE_ENTITY_SPAWN, ESCAPE_EXTRA_TIME_SECONDS, ESCAPE_HALF_EXTENT,
    ESCAPE_HEAD_START_SECONDS, ESCAPE_PLAYER_SPAWN, ESCAPE_RUN_SPEED, ESCAPE_SAFE_ZONE,
    LONGER_STUN_MULTIPLIER, SAFE_ZONE_RADIUS, SLOW_ENTITY_MULTIPLIER, STUN_COOLDOWN_SECONDS,
    STUN_RANGE, STUN_SECONDS,
};
use crate::events::{GameEvent, TickReport};
use crate::geometry::{Vec2, ray_distance};
use crate::input::{InputFrame, PlayerAction};
use crate::motion::{Bounds, OperatorBody};
use crate::shift::{JumpscareClass, JumpscareGate};
use crate::upgrades::{EffectSet, UpgradeEffect};

const SPAWN_JITTER: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapeOutcome {
    Success,
    Caught,
    TimedOut,
}

impl fmt::Display for EscapeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Caught => "caught",
            Self::TimedOut => "timed_out",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum EscapePhase {
    HeadStart,
    Pursued,
    DoorClosing { elapsed: f32 },
    Resolved { outcome: EscapeOutcome },
}

/// The thing in the corridor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EscapeEntity {
    pub position: Vec2,
    pub speed: f32,
    /// Escape-clock timestamp at which the stun wears off.
    pub stunned_until: Option<f32>,
    pub active: bool,
}

impl EscapeEntity {
    #[must_use]
    pub fn is_stunned(&self, clock: f32) -> bool {
        self.stunned_until.is_some_and(|until| clock < until)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscapeController {
    pub phase: EscapePhase,
    pub clock: f32,
    pub duration: f32,
    pub body: OperatorBody,
    pub entity: Option<EscapeEntity>,
    pub safe_zone: Vec2,
    stun_cooldown: f32,
    stun_seconds: f32,
    entity_speed: f32,
    spawn_offset: f32,
}

impl EscapeController {
    /// Set up a fresh chase; the spawn offset is drawn from the escape stream.
    pub fn new<R: Rng + ?Sized>(effects: EffectSet, rng: &mut R) -> Self {
        let duration = if effects.contains(UpgradeEffect::ExtraTime) {
            ESCAPE_DURATION_SECONDS + ESCAPE_EXTRA_TIME_SECONDS
        } else {
            ESCAPE_DURATION_SECONDS
        };
        let stun_seconds = if effects.contains(UpgradeEffect::LongerStun) {
            STUN_SECONDS * LONGER_STUN_MULTIPLIER
        } else {
            STUN_SECONDS
        };
        let entity_speed = if effects.contains(UpgradeEffect::SlowEntities) {
            ENTITY_SPEED * SLOW_ENTITY_MULTIPLIER
        } else {
            ENTITY_SPEED
        };
        log::info!("escape begins: {duration:.0}s on the clock");
        Self {
            phase: EscapePhase::HeadStart,
            clock: 0.0,
            duration,
            body: OperatorBody::at(Vec2::from_tuple(ESCAPE_PLAYER_SPAWN)),
            entity: None,
            safe_zone: Vec2::from_tuple(ESCAPE_SAFE_ZONE),
            stun_cooldown: 0.0,
            stun_seconds,
            entity_speed,
            spawn_offset: rng.gen_range(-SPAWN_JITTER..=SPAWN_JITTER),
        }
    }

    #[must_use]
    pub fn time_remaining(&self) -> f32 {
        (self.duration - self.clock).max(0.0)
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<EscapeOutcome> {
        match self.phase {
            EscapePhase::Resolved { outcome } => Some(outcome),
            _ => None,
        }
    }

    #[must_use]
    pub const fn stun_cooldown(&self) -> f32 {
        self.stun_cooldown
    }

    #[must_use]
    pub fn in_safe_zone(&self) -> bool {
        self.body.position.distance(self.safe_zone) <= SAFE_ZONE_RADIUS
    }

    pub fn tick(
        &mut self,
        frame: &InputFrame,
        dt: f32,
        jumpscares: &mut JumpscareGate,
        report: &mut TickReport,
    ) {
        if !frame.focused || self.outcome().is_some() {
            return;
        }
        self.clock += dt;

        if let EscapePhase::DoorClosing { elapsed } = self.phase {
            let elapsed = elapsed + dt;
            if elapsed >= DOOR_CLOSE_SECONDS {
                self.resolve(EscapeOutcome::Success, report);
            } else {
                self.phase = EscapePhase::DoorClosing { elapsed };
            }
            return;
        }

        let bounds = Bounds::centered(ESCAPE_HALF_EXTENT, ESCAPE_HALF_EXTENT);
        if self.body.integrate(frame, dt, ESCAPE_RUN_SPEED, &bounds) {
            report.cue(SoundCue::Footstep);
        }
        self.stun_cooldown = (self.stun_cooldown - dt).max(0.0);

        for action in &frame.actions {
            match action {
                PlayerAction::Fire => self.fire_stun(report),
                PlayerAction::Interact => self.try_close_door(report),
                other => log::trace!("escape ignores {other:?}"),
            }
        }
        if matches!(self.phase, EscapePhase::DoorClosing { .. }) {
            return;
        }

        if self.phase == EscapePhase::HeadStart && self.clock >= ESCAPE_HEAD_START_SECONDS {
            let spawn = Vec2::from_tuple(ESCAPE_ENTITY_SPAWN) + Vec2::new(self.spawn_offset, 0.0);
            self.entity = Some(EscapeEntity {
                position: spawn,
                speed: self.entity_speed,
                stunned_until: None,
                active: true,
            });
            self.phase = EscapePhase::Pursued;
            report.event(GameEvent::EntitySpawned);
        }

        if self.phase == EscapePhase::Pursued && self.advance_entity(dt) {
            jumpscares.fire(JumpscareClass::EntityCatch, report);
            self.resolve(EscapeOutcome::Caught, report);
            return;
        }

        if self.clock >= self.duration {
            self.resolve(EscapeOutcome::TimedOut, report);
        }
    }

    /// Move the entity and report whether it caught the player.
    fn advance_entity(&mut self, dt: f32) -> bool {
        let clock = self.clock;
        let target = self.body.position;
        let Some(entity) = self.entity.as_mut().filter(|e| e.active) else {
            return false;
        };
        if entity.is_stunned(clock) {
            return false;
        }
        entity.stunned_until = None;
        entity.position = entity.position.step_toward(target, entity.speed * dt);
        entity.position.distance(target) <= CAPTURE_RADIUS
    }

    fn fire_stun(&mut self, report: &mut TickReport) {
        if self.stun_cooldown > 0.0 {
            log::trace!("stun on cooldown ({:.2}s)", self.stun_cooldown);
            return;
        }
        self.stun_cooldown = STUN_COOLDOWN_SECONDS;
        report.cue(SoundCue::GunFire);

        let origin = self.body.position;
        let heading = self.body.forward();
        let until = self.clock + self.stun_seconds;
        let Some(entity) = self.entity.as_mut().filter(|e| e.active) else {
            return;
        };
        let hit = ray_distance(origin, heading, entity.position, STUN_RANGE)
            .is_some_and(|miss| miss <= ENTITY_HIT_RADIUS);
        if hit {
            entity.stunned_until = Some(until);
            log::debug!("entity stunned until {until:.2}");
            report.event(GameEvent::EntityStunned { until });
        }
    }

    fn try_close_door(&mut self, report: &mut TickReport) {
        if !self.in_safe_zone() || self.clock >= self.duration {
            log::trace!("door switch out of reach");
            return;
        }
        if let Some(entity) = self.entity.as_mut() {
            entity.active = false;
        }
        self.phase = EscapePhase::DoorClosing { elapsed: 0.0 };
        report.cue(SoundCue::DoorClose);
        report.event(GameEvent::DoorClosing);
    }

    fn resolve(&mut self, outcome: EscapeOutcome, report: &mut TickReport) {
        self.phase = EscapePhase::Resolved { outcome };
        log::info!("escape resolved: {outcome} after {:.1}s", self.clock);
        report.event(GameEvent::EscapeResolved { outcome });
    }
}
