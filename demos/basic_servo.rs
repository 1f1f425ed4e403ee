//! Basic servo control example.
//!
//! Demonstrates connecting to a servo, reading cached and live registers,
//! changing the status return level and moving by angle.
//!
//! This example runs against the in-memory AX-12 emulation, wrapped in a
//! transport that prints every diagnostic line.

use ax_servo::{
    transport::{MemoryFault, MemoryTransport, ReadBuffer, Transport},
    units::UnitExt,
    Servo, ServoId,
};

/// Mock delay provider for demonstration.
struct MockDelay;

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        // In real code, this would use hardware timer
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }
}

/// Transport that prints diagnostics and forwards to the emulated servo.
struct PrintingBus(MemoryTransport);

impl Transport for PrintingBus {
    type Error = MemoryFault;

    fn read_data(&mut self, id: ServoId, address: u8, length: usize) -> Result<ReadBuffer, Self::Error> {
        self.0.read_data(id, address, length)
    }

    fn write_data(&mut self, id: ServoId, expect_ack: bool, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.0.write_data(id, expect_ack, address, data)
    }

    fn ping(&mut self, id: ServoId) -> Result<(), Self::Error> {
        self.0.ping(id)
    }

    fn log(&mut self, args: core::fmt::Arguments<'_>) {
        println!("  [log] {}", args);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Basic Servo Control Example ===\n");

    let bus = PrintingBus(MemoryTransport::default().with_motion_polls(3));
    let mut servo = Servo::connect(bus, ServoId::DEFAULT)?;
    servo.ping()?;

    println!("Servo {} connected", servo.id());
    println!("Model: {}, firmware: {}", servo.model_number()?, servo.firmware_version()?);
    println!("Voltage: {:.1} V, temperature: {} C", servo.voltage()?, servo.present_temperature()?);
    println!("Angle: {:.2} degrees\n", servo.angle()?.value());

    println!("=== Configuration ===");
    servo.set_torque_enable(true)?;
    servo.set_moving_speed(200)?;
    servo.set_torque_limit(800)?;

    println!("\n=== Motion ===");
    servo.move_to_blocking(45.0_f32.degrees(), &mut MockDelay, 10, 20)?;
    println!("Reached {:.2} degrees", servo.angle()?.value());

    servo.move_to((-90.0_f32).degrees())?;
    println!("Goal position: {}", servo.goal_position()?);

    println!("\n=== Status Return Level ===");
    servo.set_status_return_level(0)?;
    match servo.present_voltage() {
        Ok(v) => println!("Voltage: {}", v),
        Err(e) => println!("Live read refused: {}", e),
    }
    println!("Cached moving speed still available: {}", servo.moving_speed()?);
    servo.set_status_return_level(2)?;

    println!("\n=== Example Complete ===");
    Ok(())
}
