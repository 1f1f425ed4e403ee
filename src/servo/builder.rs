//! Builder pattern for Servo.

use crate::config::{ServoConfig, SystemConfig};
use crate::error::{ConfigError, Error, Result};
use crate::transport::Transport;
use crate::units::{Degrees, DEFAULT_ZERO};

use super::driver::Servo;
use super::identity::ServoId;
use super::status::StatusReturnLevel;

/// Builder for creating Servo instances.
///
/// `build()` only assembles the handle. `connect()` also talks to the device:
/// it refreshes the cache (unless disabled) and then writes the configured
/// status return level, moving speed and torque limit, in that order.
pub struct ServoBuilder<T: Transport> {
    transport: Option<T>,
    id: Option<u8>,
    zero: Degrees,
    status_return_level: Option<u8>,
    refresh_on_connect: bool,
    moving_speed: Option<u16>,
    torque_limit: Option<u16>,
}

impl<T: Transport> Default for ServoBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> ServoBuilder<T> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            transport: None,
            id: None,
            zero: DEFAULT_ZERO,
            status_return_level: None,
            refresh_on_connect: true,
            moving_speed: None,
            torque_limit: None,
        }
    }

    /// Set the transport.
    pub fn transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the bus identity.
    pub fn id(mut self, id: u8) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the logical zero.
    pub fn zero_angle(mut self, zero: Degrees) -> Self {
        self.zero = zero;
        self
    }

    /// Status return level to write on connect.
    pub fn status_return_level(mut self, level: u8) -> Self {
        self.status_return_level = Some(level);
        self
    }

    /// Whether `connect()` refreshes the cache first.
    pub fn refresh_on_connect(mut self, refresh: bool) -> Self {
        self.refresh_on_connect = refresh;
        self
    }

    /// Moving speed to write on connect.
    pub fn moving_speed(mut self, speed: u16) -> Self {
        self.moving_speed = Some(speed);
        self
    }

    /// Torque limit to write on connect.
    pub fn torque_limit(mut self, limit: u16) -> Self {
        self.torque_limit = Some(limit);
        self
    }

    /// Configure from a ServoConfig.
    pub fn from_servo_config(mut self, config: &ServoConfig) -> Self {
        self.id = Some(config.id);
        self.zero = config.zero_angle;
        self.status_return_level = config.status_return_level;
        self.refresh_on_connect = config.refresh_on_connect;
        self.moving_speed = config.moving_speed;
        self.torque_limit = config.torque_limit;
        self
    }

    /// Configure from SystemConfig by servo name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ServoNotFound` if no servo has that name.
    pub fn from_config(self, config: &SystemConfig, servo_name: &str) -> Result<Self> {
        let servo_config = config.servo(servo_name).ok_or_else(|| {
            Error::Config(ConfigError::ServoNotFound(
                heapless::String::try_from(servo_name).unwrap_or_default(),
            ))
        })?;

        Ok(self.from_servo_config(servo_config))
    }

    /// Build the Servo without contacting the device.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if the transport or id is missing,
    /// and `ServoError::InvalidId` for ids above 252.
    pub fn build(self) -> Result<Servo<T>, T::Error> {
        self.assemble().map(|(servo, _)| servo)
    }

    /// Build the Servo and bring the device to the configured state.
    ///
    /// # Errors
    ///
    /// Anything [`build`](Self::build) returns, plus the first failing
    /// refresh or register write.
    pub fn connect(self) -> Result<Servo<T>, T::Error> {
        let (mut servo, plan) = self.assemble()?;

        if plan.refresh {
            servo.refresh()?;
        }
        if let Some(level) = plan.status_return_level {
            servo.set_status_return_level(level)?;
        }
        if let Some(speed) = plan.moving_speed {
            servo.set_moving_speed(i32::from(speed))?;
        }
        if let Some(limit) = plan.torque_limit {
            servo.set_torque_limit(i32::from(limit))?;
        }

        Ok(servo)
    }

    fn assemble(self) -> Result<(Servo<T>, ConnectPlan), T::Error> {
        let transport = self
            .transport
            .ok_or(Error::Config(ConfigError::MissingField("transport")))?;

        let id = self
            .id
            .ok_or(Error::Config(ConfigError::MissingField("id")))?;
        let id = ServoId::new(id)?;

        // Catch a bad level before anything goes on the bus.
        if let Some(level) = self.status_return_level {
            StatusReturnLevel::try_from(level)?;
        }

        let mut servo = Servo::new(transport, id);
        servo.set_zero(self.zero);

        let plan = ConnectPlan {
            refresh: self.refresh_on_connect,
            status_return_level: self.status_return_level,
            moving_speed: self.moving_speed,
            torque_limit: self.torque_limit,
        };
        Ok((servo, plan))
    }
}

struct ConnectPlan {
    refresh: bool,
    status_return_level: Option<u8>,
    moving_speed: Option<u16>,
    torque_limit: Option<u16>,
}

impl<T: Transport> Servo<T> {
    /// Create a builder for a Servo.
    pub fn builder() -> ServoBuilder<T> {
        ServoBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServoError;
    use crate::transport::{MemoryFault, MemoryTransport};

    #[test]
    fn test_build_requires_transport() {
        let result = ServoBuilder::<MemoryTransport>::new().id(1).build();
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField("transport")))
        ));
    }

    #[test]
    fn test_build_does_not_touch_device() {
        let servo = ServoBuilder::new()
            .transport(MemoryTransport::default())
            .id(1)
            .zero_angle(Degrees(90.0))
            .build()
            .unwrap();
        assert_eq!(servo.transport().calls(), 0);
        assert_eq!(servo.zero_angle(), Degrees(90.0));
    }

    #[test]
    fn test_build_rejects_bad_values() {
        let result = ServoBuilder::new()
            .transport(MemoryTransport::default())
            .id(253)
            .build();
        assert!(matches!(result, Err(Error::Servo(ServoError::InvalidId(253)))));

        let result = ServoBuilder::new()
            .transport(MemoryTransport::default())
            .id(1)
            .status_return_level(5)
            .connect();
        assert!(matches!(result, Err(Error::Servo(ServoError::InvalidLevel(5)))));
    }

    #[test]
    fn test_connect_applies_settings() {
        let servo = ServoBuilder::new()
            .transport(MemoryTransport::default())
            .id(1)
            .status_return_level(1)
            .moving_speed(200)
            .torque_limit(512)
            .connect()
            .unwrap();

        assert_eq!(servo.status_return_level(), StatusReturnLevel::ReadOnly);
        let table = servo.transport().table();
        assert_eq!(table[0x10], 1);
        assert_eq!(&table[0x20..0x22], &[200, 0]);
        assert_eq!(&table[0x22..0x24], &[0x00, 0x02]);
        // Writes after the level change don't wait for a status packet.
        assert!(!servo.transport().last_write().unwrap().expect_ack);
    }

    #[test]
    fn test_connect_without_refresh() {
        let servo = ServoBuilder::new()
            .transport(MemoryTransport::default())
            .id(1)
            .refresh_on_connect(false)
            .connect()
            .unwrap();
        assert_eq!(servo.transport().calls(), 0);
    }

    #[test]
    fn test_connect_propagates_transport_error() {
        let mut transport = MemoryTransport::default();
        transport.fail_next(MemoryFault::Injected);
        let result = ServoBuilder::new().transport(transport).id(1).connect();
        assert!(matches!(result, Err(Error::Transport(MemoryFault::Injected))));
    }

    #[test]
    fn test_from_config_unknown_servo() {
        let config = SystemConfig::default();
        let result = ServoBuilder::<MemoryTransport>::new().from_config(&config, "pan");
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::ServoNotFound(_)))
        ));
    }
}
