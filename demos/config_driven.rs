//! Example: Configuration-driven servo setup.
//!
//! This example demonstrates how to:
//! - Load servo profiles from TOML
//! - Build and connect servos from named profiles
//! - Use per-servo zero angles
//!
//! Run with: `cargo run --example config_driven --features std`

use ax_servo::{
    config::SystemConfig,
    error::{Error, Result},
    transport::{MemoryFault, MemoryTransport},
    units::Degrees,
    Servo, ServoBuilder, ServoId,
};

fn connect(config: &SystemConfig, name: &str) -> Result<Servo<MemoryTransport>, MemoryFault> {
    let profile = config
        .servo(name)
        .ok_or(Error::Config(ax_servo::ConfigError::ServoNotFound(
            heapless::String::try_from(name).unwrap_or_default(),
        )))?;

    // Each emulated bus holds exactly one servo.
    let bus = MemoryTransport::new(ServoId::new(profile.id)?);

    ServoBuilder::new()
        .from_servo_config(profile)
        .transport(bus)
        .connect()
}

fn main() -> Result<(), MemoryFault> {
    println!("=== Configuration-Driven Servo Example ===\n");

    let toml_content = r#"
[servos.pan]
name = "Pan"
id = 1
status_return_level = 1
moving_speed = 150

[servos.tilt]
name = "Tilt"
id = 2
zero_angle_deg = 90.0
torque_limit = 600
"#;

    let config = ax_servo::parse_config(toml_content).map_err(Error::widen)?;
    println!("Loaded {} servo profile(s)", config.servo_names().count());

    for name in config.servo_names() {
        let mut servo = connect(&config, name)?;
        let profile = config.servo(name).map(|p| p.name.as_str()).unwrap_or(name);

        println!("\nServo '{}' (id {}):", profile, servo.id());
        println!("  Status return level: {:?}", servo.status_return_level());
        println!("  Zero angle: {} degrees", servo.zero_angle().value());
        println!("  Moving speed: {}", servo.moving_speed()?);
        println!("  Torque limit: {}", servo.torque_limit()?);

        servo.move_to(Degrees(30.0))?;
        println!("  30 degrees -> goal position {}", servo.goal_position()?);
    }

    match ServoBuilder::<MemoryTransport>::new().from_config(&config, "roll") {
        Ok(_) => println!("\nUnexpected profile 'roll'"),
        Err(e) => println!("\nLookup of 'roll' failed: {}", e),
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
