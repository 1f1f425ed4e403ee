//! Status return level shadow.
//!
//! The device register is volatile across power cycles and always comes up
//! at [`StatusReturnLevel::All`], so every session starts there.

use crate::error::ServoError;

/// Which instructions the servo answers with a status packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum StatusReturnLevel {
    /// Respond to PING only.
    PingOnly = 0,
    /// Respond to PING and READ.
    ReadOnly = 1,
    /// Respond to every instruction.
    #[default]
    All = 2,
}

impl StatusReturnLevel {
    /// Whether writes should wait for an acknowledgement at this level.
    #[inline]
    pub const fn acknowledges_writes(self) -> bool {
        matches!(self, StatusReturnLevel::All)
    }

    /// Whether the servo answers READ instructions at this level.
    #[inline]
    pub const fn answers_reads(self) -> bool {
        !matches!(self, StatusReturnLevel::PingOnly)
    }

    /// Raw register value.
    #[inline]
    pub const fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for StatusReturnLevel {
    type Error = ServoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(StatusReturnLevel::PingOnly),
            1 => Ok(StatusReturnLevel::ReadOnly),
            2 => Ok(StatusReturnLevel::All),
            v => Err(ServoError::InvalidLevel(v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all() {
        assert_eq!(StatusReturnLevel::default(), StatusReturnLevel::All);
    }

    #[test]
    fn test_policies() {
        assert!(!StatusReturnLevel::PingOnly.answers_reads());
        assert!(StatusReturnLevel::ReadOnly.answers_reads());
        assert!(!StatusReturnLevel::ReadOnly.acknowledges_writes());
        assert!(StatusReturnLevel::All.acknowledges_writes());
    }

    #[test]
    fn test_try_from() {
        assert_eq!(StatusReturnLevel::try_from(1), Ok(StatusReturnLevel::ReadOnly));
        assert_eq!(StatusReturnLevel::try_from(3), Err(ServoError::InvalidLevel(3)));
    }
}
