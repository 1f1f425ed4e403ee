//! Unit tests for configuration parsing.

use ax_servo::config::SystemConfig;
use ax_servo::units::Degrees;

/// Test parsing a complete servo entry.
#[test]
fn test_parse_full_servo() {
    let toml_str = r#"
[servos.pan]
name = "Pan"
id = 12
zero_angle_deg = 140.5
status_return_level = 1
refresh_on_connect = false
moving_speed = 256
torque_limit = 700
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let pan = config.servo("pan").expect("pan should exist");

    assert_eq!(pan.name.as_str(), "Pan");
    assert_eq!(pan.id, 12);
    assert_eq!(pan.zero_angle, Degrees(140.5));
    assert_eq!(pan.status_return_level, Some(1));
    assert!(!pan.refresh_on_connect);
    assert_eq!(pan.moving_speed, Some(256));
    assert_eq!(pan.torque_limit, Some(700));
}

/// Test that omitted fields take their defaults.
#[test]
fn test_parse_defaults() {
    let toml_str = r#"
[servos.tilt]
id = 2
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let tilt = config.servo("tilt").expect("tilt should exist");

    assert!(tilt.name.is_empty());
    assert_eq!(tilt.zero_angle, Degrees(150.0));
    assert_eq!(tilt.status_return_level, None);
    assert!(tilt.refresh_on_connect);
    assert_eq!(tilt.moving_speed, None);
    assert_eq!(tilt.torque_limit, None);
}

/// Test listing several servos in declaration order.
#[test]
fn test_servo_names() {
    let toml_str = r#"
[servos.base]
id = 1

[servos.elbow]
id = 2

[servos.gripper]
id = 3
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let names: Vec<&str> = config.servo_names().collect();
    assert_eq!(names, ["base", "elbow", "gripper"]);
    assert!(config.servo("wrist").is_none());
}

/// Test that an empty document parses to no servos.
#[test]
fn test_parse_empty() {
    let config: SystemConfig = toml::from_str("").expect("Failed to parse TOML");
    assert_eq!(config.servo_names().count(), 0);
}

/// Test that a missing id is a parse error.
#[test]
fn test_missing_id() {
    let toml_str = r#"
[servos.pan]
name = "Pan"
"#;

    let result: Result<SystemConfig, _> = toml::from_str(toml_str);
    assert!(result.is_err());
}
