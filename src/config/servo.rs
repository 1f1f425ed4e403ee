//! Servo configuration from TOML.

use heapless::String;
use serde::Deserialize;

use crate::units::{Degrees, DEFAULT_ZERO};

/// Configuration of one servo on the bus.
///
/// ```toml
/// [servos.pan]
/// name = "Pan"
/// id = 3
/// zero_angle_deg = 150.0
/// status_return_level = 1
/// moving_speed = 200
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ServoConfig {
    /// Human-readable name (max 32 chars).
    #[serde(default)]
    pub name: String<32>,

    /// Bus identity (0-252).
    pub id: u8,

    /// Logical zero used by the angle methods.
    #[serde(default = "default_zero", rename = "zero_angle_deg")]
    pub zero_angle: Degrees,

    /// Status return level written on connect.
    #[serde(default)]
    pub status_return_level: Option<u8>,

    /// Populate the cache from the device on connect.
    #[serde(default = "default_refresh")]
    pub refresh_on_connect: bool,

    /// Moving speed written on connect.
    #[serde(default)]
    pub moving_speed: Option<u16>,

    /// Torque limit written on connect.
    #[serde(default)]
    pub torque_limit: Option<u16>,
}

fn default_zero() -> Degrees {
    DEFAULT_ZERO
}

fn default_refresh() -> bool {
    true
}

impl ServoConfig {
    /// Configuration for servo `id` with every option at its default.
    pub fn new(id: u8) -> Self {
        Self {
            name: String::new(),
            id,
            zero_angle: DEFAULT_ZERO,
            status_return_level: None,
            refresh_on_connect: true,
            moving_speed: None,
            torque_limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let config = ServoConfig::new(7);
        assert_eq!(config.id, 7);
        assert_eq!(config.zero_angle, Degrees(150.0));
        assert!(config.refresh_on_connect);
        assert!(config.status_return_level.is_none());
    }
}
