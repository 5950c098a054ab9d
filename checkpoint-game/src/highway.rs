//! Highway escape driving run played after the final shift.
use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use crate::audio::SoundCue;
use crate::constants::{
    HIGHWAY_BASE_SPEED, HIGHWAY_BATCH_DISTANCE_STEP, HIGHWAY_BEHIND_DEPTH,
    HIGHWAY_COLLISION_HALF_DEPTH, HIGHWAY_COLLISION_HALF_WIDTH, HIGHWAY_DESTROY_SECONDS,
    HIGHWAY_DRIFT_SPEED, HIGHWAY_GUN_COOLDOWN, HIGHWAY_HIT_BASE_RADIUS,
    HIGHWAY_HIT_RADIUS_PER_DEPTH, HIGHWAY_LANES, HIGHWAY_LATERAL_LIMIT, HIGHWAY_MAX_BATCH,
    HIGHWAY_MAX_SPEED, HIGHWAY_PANCAKE_SCORE, HIGHWAY_PANCAKE_SECONDS, HIGHWAY_SHOT_SCORE,
    HIGHWAY_SPAWN_BASE_INTERVAL, HIGHWAY_SPAWN_DEPTH, HIGHWAY_SPAWN_INTERVAL_DECAY,
    HIGHWAY_SPAWN_MIN_INTERVAL, HIGHWAY_SPEED_PER_DISTANCE, HIGHWAY_START_HEALTH,
    HIGHWAY_STEER_SPEED, HIGHWAY_TARGET_DISTANCE,
};
use crate::events::{GameEvent, TickReport};
use crate::input::{InputFrame, PlayerAction};
use crate::numbers::floor_f32_to_usize;

/// Road speed for a travelled distance.
#[must_use]
pub fn speed_at(distance: f32) -> f32 {
    HIGHWAY_SPEED_PER_DISTANCE
        .mul_add(distance, HIGHWAY_BASE_SPEED)
        .min(HIGHWAY_MAX_SPEED)
}

/// Seconds between spawn batches at a travelled distance.
#[must_use]
pub fn spawn_interval_at(distance: f32) -> f32 {
    HIGHWAY_SPAWN_INTERVAL_DECAY
        .mul_add(-distance, HIGHWAY_SPAWN_BASE_INTERVAL)
        .max(HIGHWAY_SPAWN_MIN_INTERVAL)
}

/// Obstacles per spawn batch at a travelled distance.
#[must_use]
pub fn batch_size_at(distance: f32) -> usize {
    (1 + floor_f32_to_usize(distance / HIGHWAY_BATCH_DISTANCE_STEP)).min(HIGHWAY_MAX_BATCH)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighwayOutcome {
    Escaped,
    Died,
}

/// Something standing in the road.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: usize,
    pub lateral: f32,
    pub depth: f32,
    pub pancaked: bool,
    pub destroyed: bool,
    pub removal_elapsed: f32,
}

impl Obstacle {
    #[must_use]
    pub const fn is_live(&self) -> bool {
        !self.pancaked && !self.destroyed
    }

    fn expired(&self) -> bool {
        (self.pancaked && self.removal_elapsed >= HIGHWAY_PANCAKE_SECONDS)
            || (self.destroyed && self.removal_elapsed >= HIGHWAY_DESTROY_SECONDS)
            || self.depth < HIGHWAY_BEHIND_DEPTH
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighwayRun {
    pub player_x: f32,
    pub speed: f32,
    pub distance: f32,
    pub target_distance: f32,
    pub obstacles: Vec<Obstacle>,
    pub gun_cooldown: f32,
    pub score: u32,
    pub health: f32,
    pub spawn_timer: f32,
    pub outcome: Option<HighwayOutcome>,
    pub(crate) next_id: u32,
}

impl Default for HighwayRun {
    fn default() -> Self {
        Self {
            player_x: 0.0,
            speed: HIGHWAY_BASE_SPEED,
            distance: 0.0,
            target_distance: HIGHWAY_TARGET_DISTANCE,
            obstacles: Vec::new(),
            gun_cooldown: 0.0,
            score: 0,
            health: HIGHWAY_START_HEALTH,
            spawn_timer: HIGHWAY_SPAWN_BASE_INTERVAL,
            outcome: None,
            next_id: 1,
        }
    }
}

impl HighwayRun {
    #[must_use]
    pub fn progress(&self) -> f32 {
        (self.distance / self.target_distance).clamp(0.0, 1.0)
    }

    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        frame: &InputFrame,
        dt: f32,
        rng: &mut R,
        report: &mut TickReport,
    ) {
        if !frame.focused || self.outcome.is_some() {
            return;
        }

        self.player_x = (self.player_x + frame.movement.x * HIGHWAY_STEER_SPEED * dt)
            .clamp(-HIGHWAY_LATERAL_LIMIT, HIGHWAY_LATERAL_LIMIT);
        self.speed = self.speed.max(speed_at(self.distance));
        self.distance += self.speed * dt;
        self.gun_cooldown = (self.gun_cooldown - dt).max(0.0);

        self.spawn_timer -= dt;
        if self.spawn_timer <= 0.0 {
            self.spawn_batch(rng);
            self.spawn_timer = spawn_interval_at(self.distance);
        }

        self.advance_obstacles(dt, report);

        if frame.has(&PlayerAction::Fire) {
            self.fire(frame.aim_x, report);
        }

        self.obstacles.retain(|obstacle| !obstacle.expired());

        if self.distance >= self.target_distance {
            self.outcome = Some(HighwayOutcome::Escaped);
            log::info!("highway escaped with score {}", self.score);
            report.event(GameEvent::HighwayFinished { won: true });
        }
    }

    fn spawn_batch<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let count = batch_size_at(self.distance).min(HIGHWAY_LANES.len());
        for lane in index::sample(rng, HIGHWAY_LANES.len(), count) {
            self.obstacles.push(Obstacle {
                id: self.next_id,
                lane,
                lateral: HIGHWAY_LANES[lane],
                depth: HIGHWAY_SPAWN_DEPTH,
                pancaked: false,
                destroyed: false,
                removal_elapsed: 0.0,
            });
            self.next_id = self.next_id.wrapping_add(1);
        }
    }

    fn advance_obstacles(&mut self, dt: f32, report: &mut TickReport) {
        let player_x = self.player_x;
        for obstacle in &mut self.obstacles {
            let before = obstacle.depth;
            obstacle.depth -= self.speed * dt;
            if !obstacle.is_live() {
                obstacle.removal_elapsed += dt;
                continue;
            }
            let drift = HIGHWAY_DRIFT_SPEED * dt;
            let gap = player_x - obstacle.lateral;
            obstacle.lateral += gap.clamp(-drift, drift);

            // Swept along depth so fast ticks cannot tunnel through the car.
            if (obstacle.lateral - player_x).abs() < HIGHWAY_COLLISION_HALF_WIDTH
                && obstacle.depth < HIGHWAY_COLLISION_HALF_DEPTH
                && before > -HIGHWAY_COLLISION_HALF_DEPTH
            {
                obstacle.pancaked = true;
                self.score = self.score.saturating_add(HIGHWAY_PANCAKE_SCORE);
                report.event(GameEvent::ObstaclePancaked { id: obstacle.id });
            }
        }
    }

    fn fire(&mut self, aim_x: f32, report: &mut TickReport) {
        if self.gun_cooldown > 0.0 {
            log::trace!("highway gun cooling down");
            return;
        }
        self.gun_cooldown = HIGHWAY_GUN_COOLDOWN;
        report.cue(SoundCue::GunFire);

        let aim = aim_x.clamp(-1.0, 1.0) * HIGHWAY_LATERAL_LIMIT;
        let target = self
            .obstacles
            .iter_mut()
            .filter(|o| o.is_live() && o.depth > 0.0)
            .filter(|o| {
                (o.lateral - aim).abs() <= HIGHWAY_HIT_RADIUS_PER_DEPTH.mul_add(o.depth, HIGHWAY_HIT_BASE_RADIUS)
            })
            .min_by(|a, b| a.depth.total_cmp(&b.depth));
        if let Some(obstacle) = target {
            obstacle.destroyed = true;
            self.score = self.score.saturating_add(HIGHWAY_SHOT_SCORE);
            report.event(GameEvent::ObstacleDestroyed { id: obstacle.id });
        }
    }

    /// Damage from outside the run (the host's hazards). Death ends the run.
    pub fn apply_external_damage(&mut self, amount: f32, report: &mut TickReport) {
        if self.outcome.is_some() {
            return;
        }
        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health <= 0.0 {
            self.outcome = Some(HighwayOutcome::Died);
            log::info!("highway run ended by external damage at {:.0}m", self.distance);
            report.event(GameEvent::HighwayFinished { won: false });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn drive(run: &mut HighwayRun, frame: &InputFrame, seconds: f32, rng: &mut SmallRng) -> TickReport {
        let mut report = TickReport::default();
        let ticks = (seconds / 0.05).round() as usize;
        for _ in 0..ticks {
            run.tick(frame, 0.05, rng, &mut report);
        }
        report
    }

    #[test]
    fn difficulty_curves_are_capped() {
        assert!((speed_at(0.0) - 20.0).abs() < f32::EPSILON);
        assert!((speed_at(5_000.0) - 60.0).abs() < f32::EPSILON);
        assert!((spawn_interval_at(0.0) - 2.0).abs() < f32::EPSILON);
        assert!((spawn_interval_at(10_000.0) - 0.6).abs() < f32::EPSILON);
        assert_eq!(batch_size_at(0.0), 1);
        assert_eq!(batch_size_at(650.0), 2);
        assert_eq!(batch_size_at(5_000.0), 3);
    }

    #[test]
    fn batches_never_share_a_lane() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut run = HighwayRun {
            distance: 1_500.0,
            ..HighwayRun::default()
        };
        run.spawn_batch(&mut rng);
        let mut lanes: Vec<_> = run.obstacles.iter().map(|o| o.lane).collect();
        assert_eq!(lanes.len(), 3);
        lanes.sort_unstable();
        lanes.dedup();
        assert_eq!(lanes.len(), 3);
    }

    #[test]
    fn steering_is_bounded_and_speed_monotonic() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut run = HighwayRun::default();
        let right = InputFrame {
            movement: crate::geometry::Vec2::new(1.0, 0.0),
            ..InputFrame::idle()
        };
        let mut last_speed = run.speed;
        for _ in 0..200 {
            run.tick(&right, 0.05, &mut rng, &mut TickReport::default());
            assert!(run.speed >= last_speed);
            last_speed = run.speed;
        }
        assert!((run.player_x - HIGHWAY_LATERAL_LIMIT).abs() < f32::EPSILON);
    }

    #[test]
    fn collision_pancakes_once_and_never_hurts() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut run = HighwayRun::default();
        run.obstacles.push(Obstacle {
            id: 99,
            lane: 2,
            lateral: 0.0,
            depth: 1.0,
            pancaked: false,
            destroyed: false,
            removal_elapsed: 0.0,
        });
        let report = drive(&mut run, &InputFrame::idle(), 0.05, &mut rng);
        assert!(report.events.contains(&GameEvent::ObstaclePancaked { id: 99 }));
        assert_eq!(run.score, HIGHWAY_PANCAKE_SCORE);
        assert!((run.health - HIGHWAY_START_HEALTH).abs() < f32::EPSILON);

        drive(&mut run, &InputFrame::idle(), 0.1, &mut rng);
        assert_eq!(run.score, HIGHWAY_PANCAKE_SCORE);
        drive(&mut run, &InputFrame::idle(), 0.6, &mut rng);
        assert!(run.obstacles.iter().all(|o| o.id != 99));
    }

    #[test]
    fn gun_destroys_nearest_aimed_obstacle() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut run = HighwayRun::default();
        for (id, depth) in [(1, 60.0), (2, 30.0)] {
            run.obstacles.push(Obstacle {
                id,
                lane: 4,
                lateral: 4.0,
                depth,
                pancaked: false,
                destroyed: false,
                removal_elapsed: 0.0,
            });
        }
        let fire = InputFrame {
            aim_x: 4.0 / HIGHWAY_LATERAL_LIMIT,
            ..InputFrame::with_action(PlayerAction::Fire)
        };
        let report = drive(&mut run, &fire, 0.05, &mut rng);
        assert!(report.events.contains(&GameEvent::ObstacleDestroyed { id: 2 }));
        assert_eq!(run.score, HIGHWAY_SHOT_SCORE);

        let report = drive(&mut run, &fire, 0.05, &mut rng);
        assert!(!report.has_cue(SoundCue::GunFire));
        let destroyed = run.obstacles.iter().find(|o| o.id == 2).unwrap();
        assert!(destroyed.destroyed && !destroyed.pancaked);
    }

    #[test]
    fn reaching_target_wins_and_external_damage_kills() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut run = HighwayRun {
            distance: HIGHWAY_TARGET_DISTANCE - 1.0,
            ..HighwayRun::default()
        };
        let report = drive(&mut run, &InputFrame::idle(), 0.05, &mut rng);
        assert_eq!(run.outcome, Some(HighwayOutcome::Escaped));
        assert!(report.events.contains(&GameEvent::HighwayFinished { won: true }));

        let mut doomed = HighwayRun::default();
        let mut report = TickReport::default();
        doomed.apply_external_damage(60.0, &mut report);
        assert!(doomed.outcome.is_none());
        doomed.apply_external_damage(60.0, &mut report);
        assert_eq!(doomed.outcome, Some(HighwayOutcome::Died));
        assert!(report.events.contains(&GameEvent::HighwayFinished { won: false }));
    }
}
