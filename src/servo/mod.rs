//! Servo handle and register access.
//!
//! - [`Servo`]: named, validated register operations for one device
//! - [`RegisterAccessor`]: the get/set engine over a transport and a cache
//! - [`ControlTableCache`]: byte mirror of the control table

mod accessor;
mod builder;
mod cache;
mod driver;
mod identity;
mod status;

pub use accessor::RegisterAccessor;
pub use builder::ServoBuilder;
pub use cache::{decode_le, high, low, ControlTableCache};
pub use driver::Servo;
pub use identity::ServoId;
pub use status::StatusReturnLevel;
