//! Register descriptors.

use crate::error::RegisterError;

use super::table::{RegisterName, TABLE_SIZE};

/// Access mode of a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Register can only be read.
    ReadOnly,
    /// Register can be read and written.
    ReadWrite,
}

/// Immutable description of one control table register.
///
/// Descriptors are compile-time data; see [`RegisterTable`](super::RegisterTable)
/// for the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDescriptor {
    /// Symbolic name.
    pub name: RegisterName,

    /// Offset into the control table.
    pub address: u8,

    /// Width in bytes (1 or 2 for this control table).
    pub width: u8,

    /// Read-only or read-write.
    pub access: Access,

    /// Inclusive minimum legal value.
    pub min: u16,

    /// Inclusive maximum legal value.
    pub max: u16,

    /// Whether the value can always be served from the cache.
    ///
    /// True for EEPROM identity/config fields that only change through this
    /// process's writes. False for live device state.
    pub cacheable: bool,
}

impl RegisterDescriptor {
    /// Create a new descriptor.
    pub const fn new(
        name: RegisterName,
        address: u8,
        width: u8,
        access: Access,
        min: u16,
        max: u16,
        cacheable: bool,
    ) -> Self {
        Self {
            name,
            address,
            width,
            access,
            min,
            max,
            cacheable,
        }
    }

    /// Shorthand for a read-write register.
    pub(crate) const fn rw(
        name: RegisterName,
        address: u8,
        width: u8,
        min: u16,
        max: u16,
        cacheable: bool,
    ) -> Self {
        Self::new(name, address, width, Access::ReadWrite, min, max, cacheable)
    }

    /// Shorthand for a read-only register.
    pub(crate) const fn ro(
        name: RegisterName,
        address: u8,
        width: u8,
        max: u16,
        cacheable: bool,
    ) -> Self {
        Self::new(name, address, width, Access::ReadOnly, 0, max, cacheable)
    }

    /// Symbolic name as a string.
    #[inline]
    pub const fn name_str(&self) -> &'static str {
        self.name.as_str()
    }

    /// One past the last control table byte covered by this register.
    #[inline]
    pub const fn end(&self) -> usize {
        self.address as usize + self.width as usize
    }

    /// Check that the width is 1 or 2 bytes.
    ///
    /// # Errors
    ///
    /// Returns `RegisterError::InvalidWidth` otherwise.
    #[inline]
    pub fn check_width(&self) -> Result<(), RegisterError> {
        match self.width {
            1 | 2 => Ok(()),
            w => Err(RegisterError::InvalidWidth(w)),
        }
    }

    /// Check the width, and that the register lies inside the control table.
    ///
    /// # Errors
    ///
    /// Returns `RegisterError::InvalidWidth` for widths other than 1 or 2, and
    /// `RegisterError::OutOfTable` if the register runs past the last byte.
    pub fn check_layout(&self) -> Result<(), RegisterError> {
        self.check_width()?;
        if self.end() > TABLE_SIZE {
            return Err(RegisterError::OutOfTable {
                address: self.address,
                width: self.width,
            });
        }
        Ok(())
    }

    /// Check whether the register accepts writes.
    #[inline]
    pub fn is_writable(&self) -> bool {
        self.access == Access::ReadWrite
    }

    /// Check if a value is within the legal range.
    #[inline]
    pub fn contains(&self, value: i32) -> bool {
        value >= i32::from(self.min) && value <= i32::from(self.max)
    }
}
