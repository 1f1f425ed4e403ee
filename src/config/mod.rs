//! Configuration module for ax-servo.
//!
//! Provides types for loading and validating servo profiles from TOML files
//! (with `std` feature) or pre-parsed data.

mod servo;
mod system;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use servo::ServoConfig;
pub use system::SystemConfig;
pub use validation::{validate_config, validate_servo};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};
