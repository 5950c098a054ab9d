//! Plain 2D vectors on the floor plane used by every spatial system.
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

/// Floor-plane vector: `x` is lateral, `y` is depth (world z).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn from_tuple(value: (f32, f32)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }

    #[must_use]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x.mul_add(other.x, self.y * other.y)
    }

    /// Unit vector in the same direction, or zero for a degenerate input.
    #[must_use]
    pub fn normalize_or_zero(self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON || !len.is_finite() {
            return Self::ZERO;
        }
        Self::new(self.x / len, self.y / len)
    }

    /// Clamp each component into `[-1, 1]` and replace NaN with 0.
    #[must_use]
    pub fn clamp_unit(self) -> Self {
        let fix = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
        Self::new(fix(self.x), fix(self.y))
    }

    /// Heading vector for a yaw angle; yaw 0 faces negative depth.
    #[must_use]
    pub fn from_yaw(yaw: f32) -> Self {
        Self::new(-yaw.sin(), -yaw.cos())
    }

    /// Move toward `target` by at most `max_step`, never overshooting.
    #[must_use]
    pub fn step_toward(self, target: Self, max_step: f32) -> Self {
        let delta = target - self;
        let dist = delta.length();
        if dist <= max_step || dist <= f32::EPSILON {
            return target;
        }
        self + delta * (max_step / dist)
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Distance from `point` to the ray `origin + t * dir` (t ≥ 0, t ≤ `max_range`).
/// Returns `None` when the closest approach lies behind the origin or past the range.
#[must_use]
pub fn ray_distance(origin: Vec2, dir: Vec2, point: Vec2, max_range: f32) -> Option<f32> {
    let dir = dir.normalize_or_zero();
    if dir == Vec2::ZERO {
        return None;
    }
    let t = (point - origin).dot(dir);
    if t < 0.0 || t > max_range {
        return None;
    }
    let closest = origin + dir * t;
    Some(closest.distance(point))
}
