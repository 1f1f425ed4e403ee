//! # ax-servo
//!
//! Control-table register access for serial-bus smart servos (AX-12 family),
//! independent of how bytes reach the bus.
//!
//! ## Features
//!
//! - **Static register catalog**: every register's address, width, access and range
//! - **Control table cache**: static registers are served without a bus round-trip
//! - **Status return level aware**: reads and acknowledgements follow the device's level
//! - **Angle conversion**: degrees relative to a configurable zero
//! - **no_std compatible**: Core library works without standard library
//! - **Configuration-driven**: Describe servos in TOML files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ax_servo::{Servo, ServoId, units::UnitExt};
//!
//! let mut servo = Servo::connect(bus, ServoId::new(3)?)?;
//!
//! servo.set_torque_enable(true)?;
//! servo.set_moving_speed(200)?;
//! servo.move_to(45.0_f32.degrees())?;
//!
//! println!("{} V, {:?}", servo.voltage()?, servo.angle()?);
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[macro_use]
mod macros;

// Core modules
pub mod config;
pub mod error;
pub mod register;
pub mod servo;
pub mod transport;
pub mod units;

// Re-exports for ergonomic API
pub use config::{validate_config, ServoConfig, SystemConfig};
pub use error::{ConfigError, Error, RegisterError, Result, ServoError};
pub use register::{Access, RegisterDescriptor, RegisterName, RegisterTable, TABLE_SIZE};
pub use servo::{ControlTableCache, RegisterAccessor, Servo, ServoBuilder, ServoId, StatusReturnLevel};
pub use transport::{MemoryTransport, Transport};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use units::{Degrees, UnitExt};
