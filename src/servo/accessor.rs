//! Register get/set against a descriptor.
//!
//! All validation (width, access, range, status return level) happens before
//! the transport is touched. The cache is patched only after the transport
//! reports success, so it always holds the last value read from or confirmed
//! written to the device.

use crate::error::{Error, RegisterError, ServoError};
use crate::register::RegisterDescriptor;
use crate::transport::Transport;

use super::cache::{decode_le, high, low, ControlTableCache};
use super::identity::ServoId;
use super::status::StatusReturnLevel;

/// Get/set engine over a transport and a cache, for one servo.
///
/// Borrowed from a [`Servo`](super::Servo) for the duration of one operation.
pub struct RegisterAccessor<'a, T: Transport> {
    transport: &'a mut T,
    cache: &'a mut ControlTableCache,
    id: ServoId,
    level: StatusReturnLevel,
}

impl<'a, T: Transport> RegisterAccessor<'a, T> {
    /// Create an accessor for servo `id` at status return level `level`.
    pub fn new(
        transport: &'a mut T,
        cache: &'a mut ControlTableCache,
        id: ServoId,
        level: StatusReturnLevel,
    ) -> Self {
        Self {
            transport,
            cache,
            id,
            level,
        }
    }

    /// Read a register.
    ///
    /// Cacheable registers are served from the cache without a transport call.
    /// Live registers are read from the device and the cache is patched with
    /// the result.
    ///
    /// # Errors
    ///
    /// - `RegisterError::InvalidWidth` for widths other than 1 or 2
    /// - `RegisterError::OutOfTable` if the register runs past the table end
    /// - `ServoError::StatusLevelTooLow` for a live read at level 0
    /// - `RegisterError::ByteCountMismatch` if the device returns the wrong length
    /// - the transport's error, unchanged
    pub fn get(&mut self, reg: &RegisterDescriptor) -> Result<u16, Error<T::Error>> {
        reg.check_layout()?;

        if reg.cacheable {
            return Ok(self.cache.read_raw(reg.address, reg.width));
        }

        if !self.level.answers_reads() {
            servo_warn!("read of {} refused at status return level 0", reg.name_str());
            return Err(ServoError::StatusLevelTooLow.into());
        }

        let bytes = self
            .transport
            .read_data(self.id, reg.address, reg.width as usize)
            .map_err(Error::Transport)?;

        if bytes.len() != reg.width as usize {
            servo_warn!(
                "read of {} returned {} bytes",
                reg.name_str(),
                bytes.len()
            );
            return Err(RegisterError::ByteCountMismatch {
                expected: reg.width as usize,
                actual: bytes.len(),
            }
            .into());
        }

        let value = decode_le(&bytes);
        self.cache.patch(reg.address, reg.width, value);
        Ok(value)
    }

    /// Write a register using the current acknowledgement policy.
    ///
    /// # Errors
    ///
    /// See [`set_with_ack`](Self::set_with_ack).
    pub fn set(&mut self, reg: &RegisterDescriptor, value: i32) -> Result<(), Error<T::Error>> {
        let expect_ack = self.level.acknowledges_writes();
        self.set_with_ack(reg, value, expect_ack)
    }

    /// Write a register with an explicit acknowledgement policy.
    ///
    /// Used by operations whose acknowledgement depends on the state being
    /// written rather than the current one.
    ///
    /// # Errors
    ///
    /// - `RegisterError::ReadOnlyRegister` for read-only registers
    /// - `RegisterError::ValueOutOfRange` if `value` is outside `[min, max]`
    /// - `RegisterError::InvalidWidth` for widths other than 1 or 2
    /// - `RegisterError::OutOfTable` if the register runs past the table end
    /// - the transport's error, unchanged; the cache is not modified
    pub fn set_with_ack(
        &mut self,
        reg: &RegisterDescriptor,
        value: i32,
        expect_ack: bool,
    ) -> Result<(), Error<T::Error>> {
        if !reg.is_writable() {
            servo_warn!("write to read-only {}", reg.name_str());
            return Err(RegisterError::ReadOnlyRegister(reg.name_str()).into());
        }

        if !reg.contains(value) {
            servo_warn!("{} out of range for {}", value, reg.name_str());
            return Err(RegisterError::ValueOutOfRange {
                register: reg.name_str(),
                value,
                min: reg.min,
                max: reg.max,
            }
            .into());
        }

        reg.check_layout()?;

        // In range, so it fits the register.
        let raw = value as u16;
        let bytes = [low(raw), high(raw)];
        let data = &bytes[..reg.width as usize];

        self.transport
            .write_data(self.id, expect_ack, reg.address, data)
            .map_err(Error::Transport)?;

        self.cache.patch(reg.address, reg.width, raw);
        servo_debug!(self.transport, self.id, "{} = {}", reg.name_str(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::{Access, RegisterName, RegisterTable};
    use crate::transport::{MemoryFault, MemoryTransport};

    fn setup() -> (MemoryTransport, ControlTableCache) {
        let mut transport = MemoryTransport::new(ServoId::DEFAULT);
        let mut cache = ControlTableCache::new();
        cache.refresh(&mut transport, ServoId::DEFAULT).unwrap();
        (transport, cache)
    }

    #[test]
    fn test_cacheable_get_skips_transport() {
        let (mut transport, mut cache) = setup();
        let before = transport.calls();
        let mut acc =
            RegisterAccessor::new(&mut transport, &mut cache, ServoId::DEFAULT, StatusReturnLevel::All);

        for reg in RegisterTable::iter().filter(|r| r.cacheable) {
            acc.get(reg).unwrap();
        }
        assert_eq!(transport.calls(), before);
    }

    #[test]
    fn test_live_get_reads_width_bytes() {
        let (mut transport, mut cache) = setup();
        transport.poke(0x24, &[0x34, 0x01]);
        let reg = RegisterTable::get(RegisterName::PresentPosition);

        let mut acc =
            RegisterAccessor::new(&mut transport, &mut cache, ServoId::DEFAULT, StatusReturnLevel::ReadOnly);
        assert_eq!(acc.get(reg).unwrap(), 0x0134);
        assert_eq!(cache.read_raw(0x24, 2), 0x0134);
        assert_eq!(transport.reads(), 2);
    }

    #[test]
    fn test_live_get_refused_at_level_zero() {
        let (mut transport, mut cache) = setup();
        let before = transport.calls();
        let reg = RegisterTable::get(RegisterName::PresentVoltage);

        let mut acc =
            RegisterAccessor::new(&mut transport, &mut cache, ServoId::DEFAULT, StatusReturnLevel::PingOnly);
        assert_eq!(acc.get(reg), Err(Error::Servo(ServoError::StatusLevelTooLow)));
        assert_eq!(transport.calls(), before);
    }

    #[test]
    fn test_short_live_read() {
        let (mut transport, mut cache) = setup();
        transport.short_next_read();
        let before = cache.clone();
        let reg = RegisterTable::get(RegisterName::PresentLoad);

        let mut acc =
            RegisterAccessor::new(&mut transport, &mut cache, ServoId::DEFAULT, StatusReturnLevel::All);
        assert_eq!(
            acc.get(reg),
            Err(Error::Register(RegisterError::ByteCountMismatch { expected: 2, actual: 1 }))
        );
        assert_eq!(cache, before);
    }

    #[test]
    fn test_invalid_width_rejected_before_transport() {
        let (mut transport, mut cache) = setup();
        let before = transport.calls();
        let bad = RegisterDescriptor::new(RegisterName::Punch, 0x30, 4, Access::ReadWrite, 0, 10, false);

        let mut acc =
            RegisterAccessor::new(&mut transport, &mut cache, ServoId::DEFAULT, StatusReturnLevel::All);
        assert_eq!(acc.get(&bad), Err(Error::Register(RegisterError::InvalidWidth(4))));
        assert_eq!(acc.set(&bad, 5), Err(Error::Register(RegisterError::InvalidWidth(4))));
        assert_eq!(transport.calls(), before);
    }

    #[test]
    fn test_register_past_table_end_rejected_before_transport() {
        let (mut transport, mut cache) = setup();
        let before = transport.calls();
        let snapshot = cache.clone();
        let out_of_table = RegisterError::OutOfTable { address: 49, width: 2 };

        let cached = RegisterDescriptor::new(RegisterName::Punch, 49, 2, Access::ReadWrite, 0, 10, true);
        let live = RegisterDescriptor::new(RegisterName::Punch, 49, 2, Access::ReadWrite, 0, 10, false);

        let mut acc =
            RegisterAccessor::new(&mut transport, &mut cache, ServoId::DEFAULT, StatusReturnLevel::All);
        assert_eq!(acc.get(&cached), Err(Error::Register(out_of_table.clone())));
        assert_eq!(acc.get(&live), Err(Error::Register(out_of_table.clone())));
        assert_eq!(acc.set(&cached, 5), Err(Error::Register(out_of_table)));
        assert_eq!(transport.calls(), before);
        assert_eq!(cache, snapshot);
    }

    #[test]
    fn test_set_patches_cache_and_uses_current_ack() {
        let (mut transport, mut cache) = setup();
        let reg = RegisterTable::get(RegisterName::MovingSpeed);

        let mut acc =
            RegisterAccessor::new(&mut transport, &mut cache, ServoId::DEFAULT, StatusReturnLevel::All);
        acc.set(reg, 300).unwrap();
        assert_eq!(acc.get(reg).unwrap(), 300);

        let write = transport.last_write().unwrap();
        assert_eq!(write.address, 0x20);
        assert_eq!(write.data.as_slice(), &[0x2C, 0x01]);
        assert!(write.expect_ack);
        assert_eq!(transport.last_log(), "servo[1].moving_speed = 300");
    }

    #[test]
    fn test_set_without_ack_below_level_two() {
        let (mut transport, mut cache) = setup();
        let reg = RegisterTable::get(RegisterName::Led);

        let mut acc =
            RegisterAccessor::new(&mut transport, &mut cache, ServoId::DEFAULT, StatusReturnLevel::ReadOnly);
        acc.set(reg, 1).unwrap();
        assert!(!transport.last_write().unwrap().expect_ack);
    }

    #[test]
    fn test_set_rejections_skip_transport() {
        let (mut transport, mut cache) = setup();
        let before = transport.calls();

        let mut acc =
            RegisterAccessor::new(&mut transport, &mut cache, ServoId::DEFAULT, StatusReturnLevel::All);
        let goal = RegisterTable::get(RegisterName::GoalPosition);
        assert!(matches!(
            acc.set(goal, 1024),
            Err(Error::Register(RegisterError::ValueOutOfRange { value: 1024, max: 1023, .. }))
        ));
        assert!(matches!(
            acc.set(goal, -1),
            Err(Error::Register(RegisterError::ValueOutOfRange { value: -1, .. }))
        ));
        let present = RegisterTable::get(RegisterName::PresentPosition);
        assert_eq!(
            acc.set(present, 10),
            Err(Error::Register(RegisterError::ReadOnlyRegister("present_position")))
        );
        assert_eq!(transport.calls(), before);
    }

    #[test]
    fn test_failed_write_leaves_cache() {
        let (mut transport, mut cache) = setup();
        transport.fail_next(MemoryFault::Injected);
        let before = cache.clone();
        let reg = RegisterTable::get(RegisterName::GoalPosition);

        let mut acc =
            RegisterAccessor::new(&mut transport, &mut cache, ServoId::DEFAULT, StatusReturnLevel::All);
        assert_eq!(acc.set(reg, 100), Err(Error::Transport(MemoryFault::Injected)));
        assert_eq!(cache, before);
    }
}
