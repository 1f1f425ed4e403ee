//! Unit tests for configuration validation.

use ax_servo::config::{parse_config, validate_config, SystemConfig};
use ax_servo::error::{ConfigError, Error};

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let toml_str = r#"
[servos.pan]
id = 0
zero_angle_deg = 0.0
status_return_level = 2

[servos.tilt]
id = 252
zero_angle_deg = 300.0
moving_speed = 1023
torque_limit = 0
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_ok());
}

/// Test validation fails for a reserved id.
#[test]
fn test_invalid_id() {
    let toml_str = r#"
[servos.pan]
id = 253
"#;

    let result = parse_config(toml_str);
    assert!(matches!(result, Err(Error::Config(ConfigError::InvalidId(253)))));
}

/// Test validation fails for a status return level above 2.
#[test]
fn test_invalid_status_return_level() {
    let toml_str = r#"
[servos.pan]
id = 1
status_return_level = 3
"#;

    let result = parse_config(toml_str);
    assert!(matches!(result, Err(Error::Config(ConfigError::InvalidLevel(3)))));
}

/// Test validation fails for a zero angle outside the travel.
#[test]
fn test_invalid_zero_angle() {
    for zero in ["-1.0", "300.5", "nan", "inf"] {
        let toml_str = format!("[servos.pan]\nid = 1\nzero_angle_deg = {zero}\n");
        let result = parse_config(&toml_str);
        assert!(
            matches!(result, Err(Error::Config(ConfigError::InvalidZeroAngle(_)))),
            "zero_angle_deg = {zero}"
        );
    }
}

/// Test validation fails for a moving speed that doesn't fit the register.
#[test]
fn test_invalid_moving_speed() {
    let toml_str = r#"
[servos.pan]
id = 1
moving_speed = 2000
"#;

    let result = parse_config(toml_str);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::ValueOutOfRange {
            register: "moving_speed",
            value: 2000
        }))
    ));
}

/// Test that the first invalid servo fails the whole configuration.
#[test]
fn test_one_bad_servo_fails_all() {
    let toml_str = r#"
[servos.good]
id = 1

[servos.bad]
id = 255
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_err());
}
