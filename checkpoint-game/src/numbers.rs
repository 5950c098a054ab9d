//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

use crate::constants::{METER_MAX, METER_MIN};

/// Clamp a meter (health, stress, compromise) into `[0, 100]`, mapping NaN to 0.
#[must_use]
pub fn clamp_meter(value: f32) -> f32 {
    if value.is_nan() {
        return METER_MIN;
    }
    value.clamp(METER_MIN, METER_MAX)
}

/// Truncate a non-negative f32 into a `usize`, returning 0 for negative or NaN values.
#[must_use]
pub fn floor_f32_to_usize(value: f32) -> usize {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    cast::<f32, usize>(value.floor()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_clamp_handles_nan_and_bounds() {
        assert!((clamp_meter(f32::NAN) - 0.0).abs() < f32::EPSILON);
        assert!((clamp_meter(140.0) - 100.0).abs() < f32::EPSILON);
        assert!((clamp_meter(-3.0) - 0.0).abs() < f32::EPSILON);
        assert!((clamp_meter(42.5) - 42.5).abs() < f32::EPSILON);
    }

    #[test]
    fn floor_covers_ranges() {
        assert_eq!(floor_f32_to_usize(2.9), 2);
        assert_eq!(floor_f32_to_usize(f32::NAN), 0);
        assert_eq!(floor_f32_to_usize(-1.0), 0);
    }
}
