//! Configuration validation.

use crate::error::{ConfigError, Error, Result};
use crate::register::{RegisterName, RegisterTable};
use crate::servo::ServoId;
use crate::units::MAX_ANGLE;

use super::{ServoConfig, SystemConfig};

/// Validate a system configuration.
///
/// Checks, for every servo:
/// - the id is assignable (0-252)
/// - the status return level is 0, 1 or 2
/// - the zero angle is finite and inside the 300 degree travel
/// - moving speed and torque limit fit their registers
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    for (_, servo) in config.servos.iter() {
        validate_servo(servo)?;
    }
    Ok(())
}

/// Validate a single servo configuration.
pub fn validate_servo(config: &ServoConfig) -> Result<()> {
    if ServoId::new(config.id).is_err() {
        return Err(Error::Config(ConfigError::InvalidId(config.id)));
    }

    if let Some(level) = config.status_return_level {
        if level > 2 {
            return Err(Error::Config(ConfigError::InvalidLevel(level)));
        }
    }

    let zero = config.zero_angle.0;
    if !zero.is_finite() || !(0.0..=MAX_ANGLE).contains(&zero) {
        return Err(Error::Config(ConfigError::InvalidZeroAngle(zero)));
    }

    check_register(RegisterName::MovingSpeed, config.moving_speed)?;
    check_register(RegisterName::TorqueLimit, config.torque_limit)?;

    Ok(())
}

fn check_register(name: RegisterName, value: Option<u16>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };

    let reg = RegisterTable::get(name);
    if !reg.contains(i32::from(value)) {
        return Err(Error::Config(ConfigError::ValueOutOfRange {
            register: reg.name_str(),
            value,
        }));
    }
    Ok(())
}
