//! Error types for ax-servo.
//!
//! Provides unified error handling across the register catalog, the servo
//! handle, configuration, and the transport collaborator.

use core::convert::Infallible;
use core::fmt;

/// Result type alias using the library's Error type.
///
/// `E` is the transport's error type. Operations that never touch a transport
/// (catalog lookup, configuration) use the default `Infallible`.
pub type Result<T, E = Infallible> = core::result::Result<T, Error<E>>;

/// Unified error type for all ax-servo operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error<E = Infallible> {
    /// Register catalog or register access error
    Register(RegisterError),
    /// Servo state or precondition error
    Servo(ServoError),
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Error raised by the transport, passed through unchanged
    Transport(E),
}

/// Register-level errors, raised before or after a single register access.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterError {
    /// Register name not present in the catalog
    UnknownRegister(heapless::String<32>),
    /// Register width is not 1 or 2 bytes
    InvalidWidth(u8),
    /// Attempt to write a read-only register
    ReadOnlyRegister(&'static str),
    /// Value outside the register's legal range
    ValueOutOfRange {
        /// Register name
        register: &'static str,
        /// Rejected value
        value: i32,
        /// Inclusive minimum
        min: u16,
        /// Inclusive maximum
        max: u16,
    },
    /// Live read returned a different number of bytes than requested
    ByteCountMismatch {
        /// Bytes requested
        expected: usize,
        /// Bytes returned
        actual: usize,
    },
    /// Register extends past the end of the control table
    OutOfTable {
        /// Start address
        address: u8,
        /// Width in bytes
        width: u8,
    },
    /// Bulk control table read returned the wrong number of bytes
    SizeMismatch {
        /// Control table size
        expected: usize,
        /// Bytes returned
        actual: usize,
    },
}

/// Servo precondition errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ServoError {
    /// Live reads are impossible while the status return level is zero
    StatusLevelTooLow,
    /// EEPROM lock is set and can only be cleared by a power cycle
    AlreadyLocked,
    /// Status return level must be 0, 1 or 2
    InvalidLevel(u8),
    /// Bus identity must be 0-252
    InvalidId(u8),
    /// Angle is NaN or infinite
    InvalidAngle,
    /// Servo still reported moving after the allowed number of polls
    MotionTimeout {
        /// Number of polls performed
        polls: u32,
    },
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Servo name not found in configuration
    ServoNotFound(heapless::String<32>),
    /// Configured servo id outside 0-252
    InvalidId(u8),
    /// Configured status return level outside 0-2
    InvalidLevel(u8),
    /// Zero angle must be finite and within the servo's 0-300 degree travel
    InvalidZeroAngle(f32),
    /// Configured register value outside its legal range
    ValueOutOfRange {
        /// Register name
        register: &'static str,
        /// Rejected value
        value: u16,
    },
    /// A required builder field was never set
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Register(e) => write!(f, "Register error: {}", e),
            Error::Servo(e) => write!(f, "Servo error: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Transport(e) => write!(f, "Transport error: {:?}", e),
        }
    }
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterError::UnknownRegister(name) => write!(f, "Unknown register '{}'", name),
            RegisterError::InvalidWidth(w) => {
                write!(f, "Invalid register width: {}. Must be 1 or 2", w)
            }
            RegisterError::ReadOnlyRegister(name) => {
                write!(f, "Register '{}' is read-only", name)
            }
            RegisterError::ValueOutOfRange { register, value, min, max } => {
                write!(f, "Value {} out of range for '{}' [{}, {}]", value, register, min, max)
            }
            RegisterError::ByteCountMismatch { expected, actual } => {
                write!(f, "Expected {} bytes, got {}", expected, actual)
            }
            RegisterError::OutOfTable { address, width } => {
                write!(f, "Register at {:#04x} ({} bytes) runs past the control table", address, width)
            }
            RegisterError::SizeMismatch { expected, actual } => {
                write!(f, "Invalid control table size: {} (expected {})", actual, expected)
            }
        }
    }
}

impl fmt::Display for ServoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServoError::StatusLevelTooLow => {
                write!(f, "Can't read while status return level is zero")
            }
            ServoError::AlreadyLocked => {
                write!(f, "EEPROM can't be unlocked; servo must be power-cycled")
            }
            ServoError::InvalidLevel(v) => {
                write!(f, "Invalid status return level: {}. Must be 0-2", v)
            }
            ServoError::InvalidId(v) => write!(f, "Invalid servo id: {}. Must be 0-252", v),
            ServoError::InvalidAngle => write!(f, "Angle must be finite"),
            ServoError::MotionTimeout { polls } => {
                write!(f, "Servo still moving after {} polls", polls)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::ServoNotFound(name) => write!(f, "Servo '{}' not found", name),
            ConfigError::InvalidId(v) => write!(f, "Invalid servo id: {}. Must be 0-252", v),
            ConfigError::InvalidLevel(v) => {
                write!(f, "Invalid status return level: {}. Must be 0-2", v)
            }
            ConfigError::InvalidZeroAngle(v) => {
                write!(f, "Invalid zero angle: {}. Must be within 0-300 degrees", v)
            }
            ConfigError::ValueOutOfRange { register, value } => {
                write!(f, "Configured value {} out of range for '{}'", value, register)
            }
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

// Conversion impls
impl<E> From<RegisterError> for Error<E> {
    fn from(e: RegisterError) -> Self {
        Error::Register(e)
    }
}

impl<E> From<ServoError> for Error<E> {
    fn from(e: ServoError) -> Self {
        Error::Servo(e)
    }
}

impl<E> From<ConfigError> for Error<E> {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl Error {
    /// Widen a transport-free error so it can be returned from a transport operation.
    pub fn widen<E>(self) -> Error<E> {
        match self {
            Error::Register(e) => Error::Register(e),
            Error::Servo(e) => Error::Servo(e),
            Error::Config(e) => Error::Config(e),
            Error::Transport(never) => match never {},
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}

#[cfg(feature = "std")]
impl std::error::Error for RegisterError {}

#[cfg(feature = "std")]
impl std::error::Error for ServoError {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widen_keeps_variant() {
        let e: Error = Error::Servo(ServoError::AlreadyLocked);
        let widened: Error<&str> = e.widen();
        assert_eq!(widened, Error::Servo(ServoError::AlreadyLocked));
    }

    #[test]
    fn test_transport_error_display() {
        let e: Error<&str> = Error::Transport("timeout");
        let mut buf = heapless::String::<64>::new();
        core::fmt::write(&mut buf, format_args!("{}", e)).unwrap();
        assert_eq!(buf.as_str(), "Transport error: \"timeout\"");
    }
}
