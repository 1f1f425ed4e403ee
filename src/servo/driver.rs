//! Servo device handle.
//!
//! Binds a bus identity, a transport, the control table cache and the status
//! return level shadow, and exposes named register operations on top of
//! [`RegisterAccessor`].

use embedded_hal::delay::DelayNs;

use crate::error::{Error, Result, ServoError};
use crate::register::{RegisterName, RegisterTable};
use crate::transport::Transport;
use crate::units::{angle_to_position, normalize_angle, position_to_angle, Degrees, DEFAULT_ZERO};

use super::accessor::RegisterAccessor;
use super::cache::ControlTableCache;
use super::identity::ServoId;
use super::status::StatusReturnLevel;

/// Handle to one servo on a bus.
///
/// All operations are synchronous request/response and take `&mut self`, so
/// one handle never has two register operations in flight. Several handles can
/// share a bus by borrowing it: `Servo<&mut Bus>`.
pub struct Servo<T: Transport> {
    /// Bus the servo is reached through.
    transport: T,

    /// Current bus identity.
    id: ServoId,

    /// Mirror of the control table.
    cache: ControlTableCache,

    /// Shadow of the device's status return level.
    level: StatusReturnLevel,

    /// Logical zero used by the angle methods.
    zero: Degrees,
}

impl<T: Transport> Servo<T> {
    /// Create a handle without touching the device.
    ///
    /// The cache starts zeroed and the status return level is assumed to be
    /// the power-on default of 2. Call [`refresh`](Self::refresh) before relying
    /// on cached registers.
    pub fn new(transport: T, id: ServoId) -> Self {
        Self {
            transport,
            id,
            cache: ControlTableCache::new(),
            level: StatusReturnLevel::default(),
            zero: DEFAULT_ZERO,
        }
    }

    /// Create a handle and populate its cache from the device.
    ///
    /// # Errors
    ///
    /// Returns the refresh error; see [`ControlTableCache::refresh`].
    pub fn connect(transport: T, id: ServoId) -> Result<Self, T::Error> {
        let mut servo = Self::new(transport, id);
        servo.refresh()?;
        Ok(servo)
    }

    /// Current bus identity.
    #[inline]
    pub fn id(&self) -> ServoId {
        self.id
    }

    /// Shadow of the device's status return level.
    #[inline]
    pub fn status_return_level(&self) -> StatusReturnLevel {
        self.level
    }

    /// The control table cache.
    #[inline]
    pub fn cache(&self) -> &ControlTableCache {
        &self.cache
    }

    /// The transport.
    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The transport, mutably.
    #[inline]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give back the transport.
    pub fn release(self) -> T {
        self.transport
    }

    fn accessor(&mut self) -> RegisterAccessor<'_, T> {
        RegisterAccessor::new(&mut self.transport, &mut self.cache, self.id, self.level)
    }

    /// Reload the whole cache from the device.
    ///
    /// # Errors
    ///
    /// See [`ControlTableCache::refresh`]; the cache is unchanged on failure.
    pub fn refresh(&mut self) -> Result<(), T::Error> {
        self.cache.refresh(&mut self.transport, self.id)
    }

    /// Send a PING and wait for the reply.
    ///
    /// It's a good idea to call this before anything else.
    pub fn ping(&mut self) -> Result<(), T::Error> {
        self.transport.ping(self.id).map_err(Error::Transport)
    }

    /// Read a register by name.
    pub fn read(&mut self, name: RegisterName) -> Result<u16, T::Error> {
        self.accessor().get(RegisterTable::get(name))
    }

    /// Write a register by name with the current acknowledgement policy.
    pub fn write(&mut self, name: RegisterName, value: i32) -> Result<(), T::Error> {
        self.accessor().set(RegisterTable::get(name), value)
    }

    /// Read a register by its snake-case name.
    ///
    /// # Errors
    ///
    /// Returns `RegisterError::UnknownRegister` for names not in the catalog.
    pub fn read_named(&mut self, name: &str) -> Result<u16, T::Error> {
        let reg = RegisterTable::lookup(name)?;
        self.accessor().get(reg)
    }

    /// Write a register by its snake-case name.
    ///
    /// # Errors
    ///
    /// Returns `RegisterError::UnknownRegister` for names not in the catalog.
    pub fn write_named(&mut self, name: &str, value: i32) -> Result<(), T::Error> {
        let reg = RegisterTable::lookup(name)?;
        self.accessor().set(reg, value)
    }

    fn read_flag(&mut self, name: RegisterName) -> Result<bool, T::Error> {
        self.read(name).map(|v| v != 0)
    }

    // -- Identity and bus behaviour

    /// Change the servo's bus identity (stored in EEPROM).
    ///
    /// The write goes to the current identity. The handle switches to the new
    /// identity only once the write succeeds.
    ///
    /// # Errors
    ///
    /// Returns `ServoError::InvalidId` for ids above 252, before any transport call.
    pub fn set_identity(&mut self, new_id: u8) -> Result<(), T::Error> {
        let new_id = ServoId::new(new_id)?;
        servo_debug!(&mut self.transport, self.id, "set_identity({})", new_id.value());
        self.write(RegisterName::Id, i32::from(new_id.value()))?;
        self.id = new_id;
        Ok(())
    }

    /// Set the status return level.
    ///
    /// - 0: respond to PING only
    /// - 1: respond to PING and READ
    /// - 2: respond to everything
    ///
    /// The device answers this write according to the *new* level, so the
    /// acknowledgement policy follows `level` rather than the shadow. The
    /// shadow is updated only after the write succeeds.
    ///
    /// Servos power up at 2 and don't keep the value across power cycles, so
    /// set it explicitly after connecting.
    ///
    /// # Errors
    ///
    /// Returns `ServoError::InvalidLevel` for values above 2.
    pub fn set_status_return_level(&mut self, level: u8) -> Result<(), T::Error> {
        let level = StatusReturnLevel::try_from(level)?;
        servo_debug!(&mut self.transport, self.id, "set_status_return_level({})", level.value());
        let reg = RegisterTable::get(RegisterName::StatusReturnLevel);
        self.accessor()
            .set_with_ack(reg, i32::from(level.value()), level.acknowledges_writes())?;
        self.level = level;
        Ok(())
    }

    /// Baud rate divisor.
    pub fn baud_rate(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::BaudRate)
    }

    /// Set the baud rate divisor.
    pub fn set_baud_rate(&mut self, value: i32) -> Result<(), T::Error> {
        self.write(RegisterName::BaudRate, value)
    }

    /// Return delay time, in units of 2 microseconds.
    pub fn return_delay_time(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::ReturnDelayTime)
    }

    /// Set the return delay time.
    pub fn set_return_delay_time(&mut self, value: i32) -> Result<(), T::Error> {
        self.write(RegisterName::ReturnDelayTime, value)
    }

    // -- EEPROM identity and limits

    /// Model number.
    pub fn model_number(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::ModelNumber)
    }

    /// Firmware version.
    pub fn firmware_version(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::FirmwareVersion)
    }

    /// Clockwise angle limit (raw position).
    pub fn cw_angle_limit(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::CwAngleLimit)
    }

    /// Set the clockwise angle limit.
    pub fn set_cw_angle_limit(&mut self, value: i32) -> Result<(), T::Error> {
        self.write(RegisterName::CwAngleLimit, value)
    }

    /// Counter-clockwise angle limit (raw position).
    pub fn ccw_angle_limit(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::CcwAngleLimit)
    }

    /// Set the counter-clockwise angle limit.
    pub fn set_ccw_angle_limit(&mut self, value: i32) -> Result<(), T::Error> {
        self.write(RegisterName::CcwAngleLimit, value)
    }

    /// Temperature shutdown threshold in degrees Celsius.
    pub fn highest_limit_temperature(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::HighestLimitTemperature)
    }

    /// Set the temperature shutdown threshold.
    pub fn set_highest_limit_temperature(&mut self, value: i32) -> Result<(), T::Error> {
        self.write(RegisterName::HighestLimitTemperature, value)
    }

    /// Lower operating voltage limit, in tenths of a volt.
    pub fn lowest_limit_voltage(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::LowestLimitVoltage)
    }

    /// Set the lower operating voltage limit.
    pub fn set_lowest_limit_voltage(&mut self, value: i32) -> Result<(), T::Error> {
        self.write(RegisterName::LowestLimitVoltage, value)
    }

    /// Upper operating voltage limit, in tenths of a volt.
    pub fn highest_limit_voltage(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::HighestLimitVoltage)
    }

    /// Set the upper operating voltage limit.
    pub fn set_highest_limit_voltage(&mut self, value: i32) -> Result<(), T::Error> {
        self.write(RegisterName::HighestLimitVoltage, value)
    }

    /// Power-on torque limit.
    pub fn max_torque(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::MaxTorque)
    }

    /// Set the power-on torque limit.
    pub fn set_max_torque(&mut self, value: i32) -> Result<(), T::Error> {
        self.write(RegisterName::MaxTorque, value)
    }

    /// Alarm conditions that blink the LED (bit mask).
    pub fn alarm_led(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::AlarmLed)
    }

    /// Set the alarm LED mask.
    pub fn set_alarm_led(&mut self, mask: i32) -> Result<(), T::Error> {
        self.write(RegisterName::AlarmLed, mask)
    }

    /// Alarm conditions that cut torque (bit mask).
    pub fn alarm_shutdown(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::AlarmShutdown)
    }

    /// Set the alarm shutdown mask.
    pub fn set_alarm_shutdown(&mut self, mask: i32) -> Result<(), T::Error> {
        self.write(RegisterName::AlarmShutdown, mask)
    }

    // -- RAM

    /// Whether torque is enabled.
    pub fn torque_enable(&mut self) -> Result<bool, T::Error> {
        self.read_flag(RegisterName::TorqueEnable)
    }

    /// Enable or disable torque.
    pub fn set_torque_enable(&mut self, state: bool) -> Result<(), T::Error> {
        servo_debug!(&mut self.transport, self.id, "set_torque_enable({})", state);
        self.write(RegisterName::TorqueEnable, i32::from(state))
    }

    /// Current state of the LED.
    pub fn led(&mut self) -> Result<bool, T::Error> {
        self.read_flag(RegisterName::Led)
    }

    /// Switch the LED on or off.
    pub fn set_led(&mut self, state: bool) -> Result<(), T::Error> {
        self.write(RegisterName::Led, i32::from(state))
    }

    /// Clockwise compliance margin.
    pub fn cw_compliance_margin(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::CwComplianceMargin)
    }

    /// Set the clockwise compliance margin.
    pub fn set_cw_compliance_margin(&mut self, value: i32) -> Result<(), T::Error> {
        self.write(RegisterName::CwComplianceMargin, value)
    }

    /// Counter-clockwise compliance margin.
    pub fn ccw_compliance_margin(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::CcwComplianceMargin)
    }

    /// Set the counter-clockwise compliance margin.
    pub fn set_ccw_compliance_margin(&mut self, value: i32) -> Result<(), T::Error> {
        self.write(RegisterName::CcwComplianceMargin, value)
    }

    /// Clockwise compliance slope.
    pub fn cw_compliance_slope(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::CwComplianceSlope)
    }

    /// Set the clockwise compliance slope.
    pub fn set_cw_compliance_slope(&mut self, value: i32) -> Result<(), T::Error> {
        self.write(RegisterName::CwComplianceSlope, value)
    }

    /// Counter-clockwise compliance slope.
    pub fn ccw_compliance_slope(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::CcwComplianceSlope)
    }

    /// Set the counter-clockwise compliance slope.
    pub fn set_ccw_compliance_slope(&mut self, value: i32) -> Result<(), T::Error> {
        self.write(RegisterName::CcwComplianceSlope, value)
    }

    /// Commanded position (raw units).
    pub fn goal_position(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::GoalPosition)
    }

    /// Command a raw position.
    ///
    /// # Errors
    ///
    /// Returns `RegisterError::ValueOutOfRange` outside `0..=1023`.
    pub fn set_goal_position(&mut self, pos: i32) -> Result<(), T::Error> {
        self.write(RegisterName::GoalPosition, pos)
    }

    /// Speed the servo moves at toward its goal. Not the measured speed.
    pub fn moving_speed(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::MovingSpeed)
    }

    /// Set the moving speed.
    pub fn set_moving_speed(&mut self, speed: i32) -> Result<(), T::Error> {
        self.write(RegisterName::MovingSpeed, speed)
    }

    /// Current torque limit.
    pub fn torque_limit(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::TorqueLimit)
    }

    /// Set the torque limit.
    pub fn set_torque_limit(&mut self, limit: i32) -> Result<(), T::Error> {
        servo_debug!(&mut self.transport, self.id, "set_torque_limit({})", limit);
        self.write(RegisterName::TorqueLimit, limit)
    }

    /// Measured position (raw units).
    pub fn present_position(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::PresentPosition)
    }

    /// Alias for [`present_position`](Self::present_position).
    pub fn position(&mut self) -> Result<u16, T::Error> {
        self.present_position()
    }

    /// Measured speed.
    pub fn present_speed(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::PresentSpeed)
    }

    /// Measured load.
    pub fn present_load(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::PresentLoad)
    }

    /// Supply voltage in tenths of a volt.
    pub fn present_voltage(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::PresentVoltage)
    }

    /// Supply voltage in volts.
    pub fn voltage(&mut self) -> Result<f32, T::Error> {
        self.present_voltage().map(|v| f32::from(v) / 10.0)
    }

    /// Internal temperature in degrees Celsius.
    pub fn present_temperature(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::PresentTemperature)
    }

    /// Whether a registered (deferred) instruction is pending.
    pub fn registered(&mut self) -> Result<bool, T::Error> {
        self.read_flag(RegisterName::Registered)
    }

    /// Whether the servo is still moving toward its goal.
    pub fn moving(&mut self) -> Result<bool, T::Error> {
        self.read_flag(RegisterName::Moving)
    }

    /// Whether the EEPROM area is locked.
    pub fn lock(&mut self) -> Result<bool, T::Error> {
        self.read_flag(RegisterName::Lock)
    }

    /// Lock or unlock the EEPROM area.
    ///
    /// Once locked, only a power cycle unlocks it. Unlocking while the cache
    /// says locked fails locally without a device round-trip; a
    /// [`refresh`](Self::refresh) after power-cycling clears the condition.
    ///
    /// # Errors
    ///
    /// Returns `ServoError::AlreadyLocked` when unlocking a locked servo.
    pub fn set_lock(&mut self, locked: bool) -> Result<(), T::Error> {
        let reg = RegisterTable::get(RegisterName::Lock);
        if !locked && self.cache.byte(reg.address) == 1 {
            return Err(ServoError::AlreadyLocked.into());
        }
        self.accessor().set(reg, i32::from(locked))
    }

    /// Minimum current at the start of a move.
    pub fn punch(&mut self) -> Result<u16, T::Error> {
        self.read(RegisterName::Punch)
    }

    /// Set the punch.
    pub fn set_punch(&mut self, value: i32) -> Result<(), T::Error> {
        self.write(RegisterName::Punch, value)
    }

    // -- Angles

    /// Logical zero used by the angle methods.
    #[inline]
    pub fn zero_angle(&self) -> Degrees {
        self.zero
    }

    /// Set the logical zero (process-side only, never written to the device).
    #[inline]
    pub fn set_zero(&mut self, offset: Degrees) {
        self.zero = offset;
    }

    /// Measured position relative to the zero angle.
    pub fn angle(&mut self) -> Result<Degrees, T::Error> {
        let pos = self.position()?;
        Ok(Degrees(position_to_angle(pos, self.zero.0)))
    }

    /// Command a position by angle relative to the zero angle.
    ///
    /// With the default zero, 0 is mid travel, 150 is fully counter-clockwise
    /// and -150 fully clockwise. The angle is folded into `[-180, 180)` first,
    /// and the resulting raw position is range-checked like any goal position.
    ///
    /// # Errors
    ///
    /// - `ServoError::InvalidAngle` for NaN or infinite angles
    /// - `RegisterError::ValueOutOfRange` if the angle falls outside the travel
    pub fn move_to(&mut self, angle: Degrees) -> Result<(), T::Error> {
        if !angle.0.is_finite() {
            return Err(ServoError::InvalidAngle.into());
        }
        let pos = angle_to_position(normalize_angle(angle.0), self.zero.0);
        self.set_goal_position(pos)
    }

    /// Move to an angle and wait until the servo stops moving.
    ///
    /// Polls the `moving` register up to `max_polls` times, waiting
    /// `poll_interval_ms` between polls.
    ///
    /// # Errors
    ///
    /// Returns `ServoError::MotionTimeout` if the servo is still moving after
    /// the last poll, plus anything [`move_to`](Self::move_to) or the register
    /// read raises.
    pub fn move_to_blocking<D: DelayNs>(
        &mut self,
        angle: Degrees,
        delay: &mut D,
        poll_interval_ms: u32,
        max_polls: u32,
    ) -> Result<(), T::Error> {
        self.move_to(angle)?;

        for _ in 0..max_polls {
            if !self.moving()? {
                return Ok(());
            }
            delay.delay_ms(poll_interval_ms);
        }

        Err(ServoError::MotionTimeout { polls: max_polls }.into())
    }
}
