//! In-memory transport emulating a single AX-12 on the bus.
//!
//! Used for tests and demos. The emulated control table starts at the AX-12
//! power-on defaults and reacts to writes the way the device does for the
//! registers this crate cares about.

use core::fmt::{self, Write};

use crate::register::{RegisterName, RegisterTable, TABLE_SIZE};
use crate::servo::ServoId;

use super::{ReadBuffer, Transport};

/// Power-on control table of an AX-12 with id 1.
const AX12_DEFAULTS: [u8; TABLE_SIZE] = [
    0x0C, 0x00, // model number 12
    0x18, // firmware version
    0x01, // id
    0x01, // baud rate (1 Mbps)
    0xFA, // return delay time
    0x00, 0x00, // cw angle limit
    0xFF, 0x03, // ccw angle limit
    0x00, // reserved
    0x46, // highest limit temperature
    0x3C, // lowest limit voltage
    0x8C, // highest limit voltage
    0xFF, 0x03, // max torque
    0x02, // status return level
    0x24, // alarm led
    0x24, // alarm shutdown
    0x00, 0x00, 0x00, 0x00, 0x00, // reserved
    0x00, // torque enable
    0x00, // led
    0x01, 0x01, // compliance margins
    0x20, 0x20, // compliance slopes
    0x00, 0x02, // goal position 512
    0x00, 0x00, // moving speed
    0xFF, 0x03, // torque limit
    0x00, 0x02, // present position 512
    0x00, 0x00, // present speed
    0x00, 0x00, // present load
    0x78, // present voltage 12.0V
    0x20, // present temperature
    0x00, // registered
    0x00, // reserved
    0x00, // moving
    0x00, // lock
    0x20, 0x00, // punch
];

const LOCKABLE_END: u8 = 0x18;

/// Failures produced by [`MemoryTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryFault {
    /// No servo answered at this id
    NoResponse(ServoId),
    /// Write applied, but the servo sent no status packet
    AckTimeout,
    /// Access past the end of the control table
    OutOfBounds {
        /// Start address
        address: u8,
        /// Requested length
        length: usize,
    },
    /// EEPROM write while the lock is set
    Locked,
    /// Failure injected by the test
    Injected,
}

/// A write observed by the emulated servo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    /// Servo addressed.
    pub id: ServoId,
    /// Start address.
    pub address: u8,
    /// Payload bytes.
    pub data: heapless::Vec<u8, TABLE_SIZE>,
    /// Whether the caller waited for a status packet.
    pub expect_ack: bool,
}

/// Emulated servo reachable through the [`Transport`] trait.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    id: ServoId,
    table: [u8; TABLE_SIZE],
    reads: usize,
    writes: usize,
    pings: usize,
    last_write: Option<RecordedWrite>,
    fail_next: Option<MemoryFault>,
    short_next_read: bool,
    motion_polls: u32,
    moving_polls_left: u32,
    last_log: heapless::String<128>,
    log_lines: usize,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new(ServoId::DEFAULT)
    }
}

impl MemoryTransport {
    /// Create an emulated servo with default control table contents.
    pub fn new(id: ServoId) -> Self {
        let mut table = AX12_DEFAULTS;
        table[RegisterTable::get(RegisterName::Id).address as usize] = id.value();
        Self {
            id,
            table,
            reads: 0,
            writes: 0,
            pings: 0,
            last_write: None,
            fail_next: None,
            short_next_read: false,
            motion_polls: 0,
            moving_polls_left: 0,
            last_log: heapless::String::new(),
            log_lines: 0,
        }
    }

    /// Report `moving = 1` for this many polls after every goal position write.
    pub fn with_motion_polls(mut self, polls: u32) -> Self {
        self.motion_polls = polls;
        self
    }

    /// Id the emulated servo currently answers to.
    #[inline]
    pub fn id(&self) -> ServoId {
        self.id
    }

    /// Emulated control table.
    #[inline]
    pub fn table(&self) -> &[u8; TABLE_SIZE] {
        &self.table
    }

    /// Overwrite device memory directly, bypassing write rules.
    pub fn poke(&mut self, address: u8, data: &[u8]) {
        let start = address as usize;
        self.table[start..start + data.len()].copy_from_slice(data);
    }

    /// Number of `read_data` calls, successful or not.
    #[inline]
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Number of `write_data` calls, successful or not.
    #[inline]
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Number of `ping` calls.
    #[inline]
    pub fn pings(&self) -> usize {
        self.pings
    }

    /// Total transport calls excluding logging.
    #[inline]
    pub fn calls(&self) -> usize {
        self.reads + self.writes + self.pings
    }

    /// Most recent write that reached the device.
    #[inline]
    pub fn last_write(&self) -> Option<&RecordedWrite> {
        self.last_write.as_ref()
    }

    /// Fail the next read, write or ping with `fault`.
    pub fn fail_next(&mut self, fault: MemoryFault) {
        self.fail_next = Some(fault);
    }

    /// Return one byte fewer than requested on the next read.
    pub fn short_next_read(&mut self) {
        self.short_next_read = true;
    }

    /// Last line written to the diagnostic sink (truncated to 128 bytes).
    #[inline]
    pub fn last_log(&self) -> &str {
        self.last_log.as_str()
    }

    /// Number of diagnostic lines received.
    #[inline]
    pub fn log_lines(&self) -> usize {
        self.log_lines
    }

    fn byte(&self, name: RegisterName) -> u8 {
        self.table[RegisterTable::get(name).address as usize]
    }

    fn check(&mut self, id: ServoId) -> Result<(), MemoryFault> {
        if let Some(fault) = self.fail_next.take() {
            return Err(fault);
        }
        if id != self.id {
            return Err(MemoryFault::NoResponse(id));
        }
        Ok(())
    }

    fn check_bounds(address: u8, length: usize) -> Result<(), MemoryFault> {
        if address as usize + length > TABLE_SIZE {
            return Err(MemoryFault::OutOfBounds { address, length });
        }
        Ok(())
    }

    fn apply_write(&mut self, address: u8, data: &[u8]) -> Result<(), MemoryFault> {
        let locked = self.byte(RegisterName::Lock) == 1;
        if locked && address < LOCKABLE_END {
            return Err(MemoryFault::Locked);
        }

        let start = address as usize;
        let lock_addr = RegisterTable::get(RegisterName::Lock).address as usize;
        for (offset, &b) in data.iter().enumerate() {
            let addr = start + offset;
            // Only a power cycle clears the lock.
            if addr == lock_addr && locked {
                continue;
            }
            self.table[addr] = b;
        }

        let end = start + data.len();
        let covers = |name: RegisterName| {
            let reg = RegisterTable::get(name);
            start <= reg.address as usize && reg.end() <= end
        };

        if covers(RegisterName::Id) {
            self.id = ServoId::from_raw(self.byte(RegisterName::Id));
        }

        if covers(RegisterName::GoalPosition) {
            let goal = RegisterTable::get(RegisterName::GoalPosition).address as usize;
            let present = RegisterTable::get(RegisterName::PresentPosition).address as usize;
            self.table[present] = self.table[goal];
            self.table[present + 1] = self.table[goal + 1];
            self.moving_polls_left = self.motion_polls;
        }

        Ok(())
    }
}

impl Transport for MemoryTransport {
    type Error = MemoryFault;

    fn read_data(
        &mut self,
        id: ServoId,
        address: u8,
        length: usize,
    ) -> Result<ReadBuffer, Self::Error> {
        self.reads += 1;
        self.check(id)?;
        if self.byte(RegisterName::StatusReturnLevel) == 0 {
            return Err(MemoryFault::NoResponse(id));
        }
        Self::check_bounds(address, length)?;

        let moving = RegisterTable::get(RegisterName::Moving).address;
        if address <= moving && (moving as usize) < address as usize + length {
            let flag = if self.moving_polls_left > 0 {
                self.moving_polls_left -= 1;
                1
            } else {
                0
            };
            self.table[moving as usize] = flag;
        }

        let mut len = length;
        if self.short_next_read {
            self.short_next_read = false;
            len = len.saturating_sub(1);
        }

        let start = address as usize;
        let mut out = ReadBuffer::new();
        // `len` never exceeds TABLE_SIZE, which is below MAX_READ.
        let _ = out.extend_from_slice(&self.table[start..start + len]);
        Ok(out)
    }

    fn write_data(
        &mut self,
        id: ServoId,
        expect_ack: bool,
        address: u8,
        data: &[u8],
    ) -> Result<(), Self::Error> {
        self.writes += 1;
        self.check(id)?;
        Self::check_bounds(address, data.len())?;
        self.apply_write(address, data)?;

        let mut recorded = heapless::Vec::new();
        let _ = recorded.extend_from_slice(data);
        self.last_write = Some(RecordedWrite {
            id,
            address,
            data: recorded,
            expect_ack,
        });

        // The servo answers this write according to the level now in its table.
        if expect_ack && self.byte(RegisterName::StatusReturnLevel) != 2 {
            return Err(MemoryFault::AckTimeout);
        }
        Ok(())
    }

    fn ping(&mut self, id: ServoId) -> Result<(), Self::Error> {
        self.pings += 1;
        self.check(id)
    }

    fn log(&mut self, args: fmt::Arguments<'_>) {
        self.log_lines += 1;
        self.last_log.clear();
        let _ = self.last_log.write_fmt(args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(v: u8) -> ServoId {
        ServoId::new(v).unwrap()
    }

    #[test]
    fn test_defaults_cover_table() {
        let t = MemoryTransport::new(id(7));
        assert_eq!(t.table()[0x03], 7);
        assert_eq!(t.table()[0x10], 2);
        assert_eq!(t.table()[0x2A], 120);
    }

    #[test]
    fn test_wrong_id_gets_no_response() {
        let mut t = MemoryTransport::new(id(1));
        assert_eq!(t.ping(id(2)), Err(MemoryFault::NoResponse(id(2))));
        assert!(t.ping(id(1)).is_ok());
        assert_eq!(t.pings(), 2);
    }

    #[test]
    fn test_goal_write_moves_present_position() {
        let mut t = MemoryTransport::new(id(1));
        t.write_data(id(1), true, 0x1E, &[0xFF, 0x01]).unwrap();
        let bytes = t.read_data(id(1), 0x24, 2).unwrap();
        assert_eq!(bytes.as_slice(), &[0xFF, 0x01]);
    }

    #[test]
    fn test_id_write_renames_device() {
        let mut t = MemoryTransport::new(id(1));
        t.write_data(id(1), true, 0x03, &[9]).unwrap();
        assert_eq!(t.id(), id(9));
        assert!(t.ping(id(1)).is_err());
    }

    #[test]
    fn test_ack_follows_new_level() {
        let mut t = MemoryTransport::new(id(1));
        assert_eq!(t.write_data(id(1), true, 0x10, &[1]), Err(MemoryFault::AckTimeout));
        assert_eq!(t.table()[0x10], 1);
        assert!(t.write_data(id(1), false, 0x10, &[0]).is_ok());
        assert!(t.read_data(id(1), 0x24, 2).is_err());
    }

    #[test]
    fn test_lock_blocks_eeprom_and_sticks() {
        let mut t = MemoryTransport::new(id(1));
        t.write_data(id(1), true, 0x2F, &[1]).unwrap();
        assert_eq!(t.write_data(id(1), true, 0x04, &[3]), Err(MemoryFault::Locked));
        t.write_data(id(1), true, 0x2F, &[0]).unwrap();
        assert_eq!(t.table()[0x2F], 1);
    }

    #[test]
    fn test_short_read() {
        let mut t = MemoryTransport::new(id(1));
        t.short_next_read();
        assert_eq!(t.read_data(id(1), 0x24, 2).unwrap().len(), 1);
        assert_eq!(t.read_data(id(1), 0x24, 2).unwrap().len(), 2);
    }

    #[test]
    fn test_log_keeps_last_line() {
        let mut t = MemoryTransport::default();
        t.log(format_args!("first {}", 1));
        t.log(format_args!("second {}", 2));
        assert_eq!(t.last_log(), "second 2");
        assert_eq!(t.log_lines(), 2);
    }
}
