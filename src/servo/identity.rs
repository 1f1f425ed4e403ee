//! Servo bus identity.

use crate::error::ServoError;

/// Bus identity of a servo (0-252).
///
/// 253 and above are reserved, with 254 being the broadcast address, so they
/// are never legal as the fixed identity of one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServoId(u8);

impl ServoId {
    /// Highest assignable identity.
    pub const MAX: u8 = 252;

    /// Factory default identity.
    pub const DEFAULT: Self = Self(1);

    /// Create a new ServoId with validation.
    ///
    /// # Errors
    ///
    /// Returns `ServoError::InvalidId` if `value` is above 252.
    pub const fn new(value: u8) -> Result<Self, ServoError> {
        if value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(ServoError::InvalidId(value))
        }
    }

    /// Wrap a raw byte read back from a device without validation.
    #[inline]
    pub(crate) const fn from_raw(value: u8) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for ServoId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for ServoId {
    type Error = ServoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServoId> for u8 {
    fn from(id: ServoId) -> u8 {
        id.0
    }
}

impl core::fmt::Display for ServoId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
