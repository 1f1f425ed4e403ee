//! Register module for ax-servo.
//!
//! Provides the immutable register descriptors and the static control table
//! catalog they are looked up from.

mod descriptor;
mod table;

pub use descriptor::{Access, RegisterDescriptor};
pub use table::{RegisterName, RegisterTable, TABLE_SIZE};
