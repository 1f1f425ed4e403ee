//! Control table cache.
//!
//! A flat byte mirror of the device's control table, addressed by register
//! offset. Multi-byte values are little-endian, low byte first.

use crate::error::{Error, RegisterError};
use crate::register::TABLE_SIZE;
use crate::transport::Transport;

use super::identity::ServoId;

/// Low byte of a register value.
#[inline]
pub const fn low(value: u16) -> u8 {
    (value & 0xFF) as u8
}

/// High byte of a register value.
#[inline]
pub const fn high(value: u16) -> u8 {
    (value >> 8) as u8
}

/// Decode up to two little-endian bytes.
#[inline]
pub fn decode_le(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .take(2)
        .enumerate()
        .fold(0u16, |acc, (i, &b)| acc | (u16::from(b) << (8 * i)))
}

/// Byte mirror of a servo's control table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlTableCache {
    bytes: [u8; TABLE_SIZE],
}

impl Default for ControlTableCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlTableCache {
    /// Create a zero-filled cache.
    #[inline]
    pub const fn new() -> Self {
        Self {
            bytes: [0; TABLE_SIZE],
        }
    }

    /// Create a cache from a full table snapshot.
    #[inline]
    pub const fn from_bytes(bytes: [u8; TABLE_SIZE]) -> Self {
        Self { bytes }
    }

    /// Replace the whole cache with one bulk read of the device's table.
    ///
    /// The cache is left untouched if the read fails or returns the wrong
    /// number of bytes.
    ///
    /// # Errors
    ///
    /// Returns `RegisterError::SizeMismatch` for a short or long reply, or the
    /// transport's error.
    pub fn refresh<T: Transport>(
        &mut self,
        transport: &mut T,
        id: ServoId,
    ) -> Result<(), Error<T::Error>> {
        let data = transport
            .read_data(id, 0x00, TABLE_SIZE)
            .map_err(Error::Transport)?;

        if data.len() != TABLE_SIZE {
            return Err(RegisterError::SizeMismatch {
                expected: TABLE_SIZE,
                actual: data.len(),
            }
            .into());
        }

        self.bytes.copy_from_slice(&data);
        Ok(())
    }

    /// Decode `width` bytes at `address` as an unsigned little-endian integer.
    ///
    /// # Panics
    ///
    /// Panics if the range falls outside the control table.
    #[inline]
    pub fn read_raw(&self, address: u8, width: u8) -> u16 {
        let start = address as usize;
        decode_le(&self.bytes[start..start + width as usize])
    }

    /// Store `value` at `address`: the low byte, then the high byte if `width` is 2.
    ///
    /// # Panics
    ///
    /// Panics if the range falls outside the control table.
    #[inline]
    pub fn patch(&mut self, address: u8, width: u8, value: u16) {
        let start = address as usize;
        self.bytes[start] = low(value);
        if width == 2 {
            self.bytes[start + 1] = high(value);
        }
    }

    /// Single cached byte.
    #[inline]
    pub fn byte(&self, address: u8) -> u8 {
        self.bytes[address as usize]
    }

    /// The raw cached table.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; TABLE_SIZE] {
        &self.bytes
    }
}
