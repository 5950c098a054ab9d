//! First-person body integration shared by the booth and the escape corridor.
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::constants::{FOOTSTEP_INTERVAL_SECONDS, LOOK_SENSITIVITY, PITCH_LIMIT};
use crate::geometry::Vec2;
use crate::input::InputFrame;

/// Axis-aligned walkable rectangle on the floor plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    #[must_use]
    pub const fn centered(half_width: f32, half_depth: f32) -> Self {
        Self {
            min: Vec2::new(-half_width, -half_depth),
            max: Vec2::new(half_width, half_depth),
        }
    }

    #[must_use]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }
}

/// The operator's position and view direction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OperatorBody {
    pub position: Vec2,
    pub yaw: f32,
    pub pitch: f32,
    footstep_timer: f32,
}

impl OperatorBody {
    #[must_use]
    pub const fn at(position: Vec2) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            footstep_timer: 0.0,
        }
    }

    #[must_use]
    pub fn forward(&self) -> Vec2 {
        Vec2::from_yaw(self.yaw)
    }

    #[must_use]
    pub fn right(&self) -> Vec2 {
        Vec2::from_yaw(self.yaw - FRAC_PI_2)
    }

    /// Apply look and movement for one tick. Returns `true` when a footstep is due.
    pub fn integrate(&mut self, frame: &InputFrame, dt: f32, speed: f32, bounds: &Bounds) -> bool {
        self.yaw -= frame.look.x * LOOK_SENSITIVITY;
        self.pitch = (self.pitch - frame.look.y * LOOK_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let wish = self.right() * frame.movement.x + self.forward() * frame.movement.y;
        let wish = wish.normalize_or_zero();
        if wish == Vec2::ZERO {
            self.footstep_timer = 0.0;
            return false;
        }
        let before = self.position;
        self.position = bounds.clamp(self.position + wish * (speed * dt));
        if self.position.distance(before) <= f32::EPSILON {
            return false;
        }
        self.footstep_timer += dt;
        if self.footstep_timer >= FOOTSTEP_INTERVAL_SECONDS {
            self.footstep_timer -= FOOTSTEP_INTERVAL_SECONDS;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walking_forward() -> InputFrame {
        InputFrame {
            movement: Vec2::new(0.0, 1.0),
            ..InputFrame::idle()
        }
    }

    #[test]
    fn forward_moves_toward_negative_depth_and_clamps() {
        let bounds = Bounds::centered(3.0, 2.5);
        let mut body = OperatorBody::default();
        body.integrate(&walking_forward(), 0.1, 2.0, &bounds);
        assert!((body.position.y + 0.2).abs() < 1e-5);
        for _ in 0..100 {
            body.integrate(&walking_forward(), 0.1, 2.0, &bounds);
        }
        assert!((body.position.y + 2.5).abs() < 1e-5);
    }

    #[test]
    fn footsteps_follow_walking_time() {
        let bounds = Bounds::centered(30.0, 30.0);
        let mut body = OperatorBody::default();
        let steps = (0..20)
            .filter(|_| body.integrate(&walking_forward(), 0.125, 1.0, &bounds))
            .count();
        assert_eq!(steps, 5);
        assert!(!body.integrate(&InputFrame::idle(), 0.1, 1.0, &bounds));
    }

    #[test]
    fn pitch_is_limited() {
        let mut body = OperatorBody::default();
        let frame = InputFrame {
            look: Vec2::new(0.0, -10_000.0),
            ..InputFrame::idle()
        };
        body.integrate(&frame, 0.016, 1.0, &Bounds::centered(1.0, 1.0));
        assert!((body.pitch - PITCH_LIMIT).abs() < f32::EPSILON);
    }
}
