//! Position/angle conversion.
//!
//! Raw positions span `0..=1023` over 300 degrees of travel. Angles are
//! relative to a process-side zero offset, 150 degrees (mid travel) by default.

use core::ops::{Add, Sub};

use serde::Deserialize;

/// Full travel in degrees.
pub const MAX_ANGLE: f32 = 300.0;

/// Highest raw position.
pub const MAX_POSITION: u16 = 1023;

/// Degrees per raw position unit (about 0.2933).
pub const POSITION_TO_ANGLE: f32 = MAX_ANGLE / MAX_POSITION as f32;

/// Raw position units per degree (3.41).
pub const ANGLE_TO_POSITION: f32 = 1.0 / POSITION_TO_ANGLE;

/// Default zero offset: the middle of the servo's travel.
pub const DEFAULT_ZERO: Degrees = Degrees(150.0);

/// Angular position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f32);

impl Degrees {
    /// Create a new Degrees value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Fold into `[-180, 180)`.
    #[inline]
    pub fn normalized(self) -> Self {
        Self(normalize_angle(self.0))
    }
}

impl Add for Degrees {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Degrees {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Angle of raw position `pos` relative to `zero`.
#[inline]
pub fn position_to_angle(pos: u16, zero: f32) -> f32 {
    POSITION_TO_ANGLE * f32::from(pos) - zero
}

/// Raw position for `angle` relative to `zero`, truncated toward zero.
///
/// The result is not range-checked; it can be negative or above 1023.
#[inline]
pub fn angle_to_position(angle: f32, zero: f32) -> i32 {
    libm::truncf((zero + angle) * ANGLE_TO_POSITION) as i32
}

/// Fold an angle into `[-180, 180)`.
///
/// 180 maps to -180. Values already in range are returned unchanged, so the
/// fold is idempotent. NaN and infinities are returned as-is.
pub fn normalize_angle(d: f32) -> f32 {
    if !d.is_finite() || (-180.0..180.0).contains(&d) {
        return d;
    }

    // fmodf is exact, and both corrections below are exact for |r| < 360.
    let r = libm::fmodf(d, 360.0);
    if r >= 180.0 {
        r - 360.0
    } else if r < -180.0 {
        r + 360.0
    } else {
        r
    }
}

/// Extension trait for creating unit types from primitives.
pub trait UnitExt {
    /// Convert to Degrees.
    fn degrees(self) -> Degrees;
}

impl UnitExt for f32 {
    #[inline]
    fn degrees(self) -> Degrees {
        Degrees(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!((POSITION_TO_ANGLE - 0.293_255_13).abs() < 1e-6);
        assert!((ANGLE_TO_POSITION - 3.41).abs() < 1e-4);
    }

    #[test]
    fn test_zero_angle_is_mid_travel() {
        assert_eq!(angle_to_position(0.0, 150.0), 511);
        assert!(position_to_angle(511, 150.0).abs() < POSITION_TO_ANGLE);
    }

    #[test]
    fn test_travel_ends() {
        assert_eq!(angle_to_position(-150.0, 150.0), 0);
        assert!((position_to_angle(1023, 150.0) - 150.0).abs() < 1e-3);
        assert!((position_to_angle(0, 150.0) + 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_truncates_toward_zero() {
        // -0.1 degrees from the bottom of travel is -0.341 units, truncated to 0.
        assert_eq!(angle_to_position(-150.1, 150.0), 0);
        assert_eq!(angle_to_position(-151.0, 150.0), -3);
    }

    #[test]
    fn test_normalize_boundaries() {
        assert_eq!(normalize_angle(180.0), -180.0);
        assert_eq!(normalize_angle(-180.0), -180.0);
        assert_eq!(normalize_angle(540.0), -180.0);
        assert_eq!(normalize_angle(360.0), 0.0);
        assert_eq!(normalize_angle(190.0), -170.0);
        assert_eq!(normalize_angle(-190.0), 170.0);
        assert_eq!(normalize_angle(725.0), 5.0);
        assert_eq!(normalize_angle(179.5), 179.5);
    }

    #[test]
    fn test_normalize_non_finite() {
        assert!(normalize_angle(f32::NAN).is_nan());
        assert_eq!(normalize_angle(f32::INFINITY), f32::INFINITY);
    }

    #[test]
    fn test_degrees_ext() {
        assert_eq!(90.0f32.degrees(), Degrees(90.0));
        assert_eq!(Degrees(200.0).normalized(), Degrees(-160.0));
    }
}
