//! Transport capability consumed by the servo handle.
//!
//! Framing, checksums and serial timing live behind this trait. The servo
//! layer never retries or reinterprets transport errors.

use core::fmt;

use crate::servo::ServoId;

pub mod memory;

pub use memory::{MemoryFault, MemoryTransport};

/// Maximum number of bytes a single read may return.
pub const MAX_READ: usize = 64;

/// Bytes returned by [`Transport::read_data`].
///
/// Sized above the control table so over-long replies stay representable.
pub type ReadBuffer = heapless::Vec<u8, MAX_READ>;

/// Request/response access to servos on a bus.
pub trait Transport {
    /// Error raised by the transport.
    type Error: fmt::Debug;

    /// Read `length` bytes starting at `address` from servo `id`.
    ///
    /// Implementations should return exactly `length` bytes; callers verify.
    fn read_data(
        &mut self,
        id: ServoId,
        address: u8,
        length: usize,
    ) -> Result<ReadBuffer, Self::Error>;

    /// Write `data` starting at `address` on servo `id`.
    ///
    /// When `expect_ack` is true the transport waits for and validates the
    /// servo's status packet before returning.
    fn write_data(
        &mut self,
        id: ServoId,
        expect_ack: bool,
        address: u8,
        data: &[u8],
    ) -> Result<(), Self::Error>;

    /// Send a PING and wait for the reply.
    fn ping(&mut self, id: ServoId) -> Result<(), Self::Error>;

    /// Best-effort diagnostic sink.
    fn log(&mut self, args: fmt::Arguments<'_>) {
        let _ = args;
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    #[inline]
    fn read_data(
        &mut self,
        id: ServoId,
        address: u8,
        length: usize,
    ) -> Result<ReadBuffer, Self::Error> {
        T::read_data(self, id, address, length)
    }

    #[inline]
    fn write_data(
        &mut self,
        id: ServoId,
        expect_ack: bool,
        address: u8,
        data: &[u8],
    ) -> Result<(), Self::Error> {
        T::write_data(self, id, expect_ack, address, data)
    }

    #[inline]
    fn ping(&mut self, id: ServoId) -> Result<(), Self::Error> {
        T::ping(self, id)
    }

    #[inline]
    fn log(&mut self, args: fmt::Arguments<'_>) {
        T::log(self, args)
    }
}
