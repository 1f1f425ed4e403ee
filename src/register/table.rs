//! Static control table catalog for AX-12 class servos.
//!
//! Addresses, widths and ranges follow the AX-12 control table. Entries are
//! ordered by address and indexed by [`RegisterName`] discriminant.

use core::str::FromStr;

use crate::error::RegisterError;

use super::descriptor::RegisterDescriptor;

/// Symbolic register names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum RegisterName {
    ModelNumber,
    FirmwareVersion,
    Id,
    BaudRate,
    ReturnDelayTime,
    CwAngleLimit,
    CcwAngleLimit,
    HighestLimitTemperature,
    LowestLimitVoltage,
    HighestLimitVoltage,
    MaxTorque,
    StatusReturnLevel,
    AlarmLed,
    AlarmShutdown,
    TorqueEnable,
    Led,
    CwComplianceMargin,
    CcwComplianceMargin,
    CwComplianceSlope,
    CcwComplianceSlope,
    GoalPosition,
    MovingSpeed,
    TorqueLimit,
    PresentPosition,
    PresentSpeed,
    PresentLoad,
    PresentVoltage,
    PresentTemperature,
    Registered,
    Moving,
    Lock,
    Punch,
}

impl RegisterName {
    /// Every register, in catalog order.
    pub const ALL: [RegisterName; 32] = [
        RegisterName::ModelNumber,
        RegisterName::FirmwareVersion,
        RegisterName::Id,
        RegisterName::BaudRate,
        RegisterName::ReturnDelayTime,
        RegisterName::CwAngleLimit,
        RegisterName::CcwAngleLimit,
        RegisterName::HighestLimitTemperature,
        RegisterName::LowestLimitVoltage,
        RegisterName::HighestLimitVoltage,
        RegisterName::MaxTorque,
        RegisterName::StatusReturnLevel,
        RegisterName::AlarmLed,
        RegisterName::AlarmShutdown,
        RegisterName::TorqueEnable,
        RegisterName::Led,
        RegisterName::CwComplianceMargin,
        RegisterName::CcwComplianceMargin,
        RegisterName::CwComplianceSlope,
        RegisterName::CcwComplianceSlope,
        RegisterName::GoalPosition,
        RegisterName::MovingSpeed,
        RegisterName::TorqueLimit,
        RegisterName::PresentPosition,
        RegisterName::PresentSpeed,
        RegisterName::PresentLoad,
        RegisterName::PresentVoltage,
        RegisterName::PresentTemperature,
        RegisterName::Registered,
        RegisterName::Moving,
        RegisterName::Lock,
        RegisterName::Punch,
    ];

    /// Snake-case name used in configuration and diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            RegisterName::ModelNumber => "model_number",
            RegisterName::FirmwareVersion => "firmware_version",
            RegisterName::Id => "id",
            RegisterName::BaudRate => "baud_rate",
            RegisterName::ReturnDelayTime => "return_delay_time",
            RegisterName::CwAngleLimit => "cw_angle_limit",
            RegisterName::CcwAngleLimit => "ccw_angle_limit",
            RegisterName::HighestLimitTemperature => "highest_limit_temperature",
            RegisterName::LowestLimitVoltage => "lowest_limit_voltage",
            RegisterName::HighestLimitVoltage => "highest_limit_voltage",
            RegisterName::MaxTorque => "max_torque",
            RegisterName::StatusReturnLevel => "status_return_level",
            RegisterName::AlarmLed => "alarm_led",
            RegisterName::AlarmShutdown => "alarm_shutdown",
            RegisterName::TorqueEnable => "torque_enable",
            RegisterName::Led => "led",
            RegisterName::CwComplianceMargin => "cw_compliance_margin",
            RegisterName::CcwComplianceMargin => "ccw_compliance_margin",
            RegisterName::CwComplianceSlope => "cw_compliance_slope",
            RegisterName::CcwComplianceSlope => "ccw_compliance_slope",
            RegisterName::GoalPosition => "goal_position",
            RegisterName::MovingSpeed => "moving_speed",
            RegisterName::TorqueLimit => "torque_limit",
            RegisterName::PresentPosition => "present_position",
            RegisterName::PresentSpeed => "present_speed",
            RegisterName::PresentLoad => "present_load",
            RegisterName::PresentVoltage => "present_voltage",
            RegisterName::PresentTemperature => "present_temperature",
            RegisterName::Registered => "registered",
            RegisterName::Moving => "moving",
            RegisterName::Lock => "lock",
            RegisterName::Punch => "punch",
        }
    }
}

impl FromStr for RegisterName {
    type Err = RegisterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegisterName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| {
                let mut truncated = heapless::String::new();
                for c in s.chars() {
                    if truncated.push(c).is_err() {
                        break;
                    }
                }
                RegisterError::UnknownRegister(truncated)
            })
    }
}

use RegisterName as N;

const CATALOG: [RegisterDescriptor; 32] = [
    // EEPROM
    RegisterDescriptor::ro(N::ModelNumber, 0x00, 2, u16::MAX, true),
    RegisterDescriptor::ro(N::FirmwareVersion, 0x02, 1, 0xFF, true),
    RegisterDescriptor::rw(N::Id, 0x03, 1, 0, 252, true),
    RegisterDescriptor::rw(N::BaudRate, 0x04, 1, 0, 254, true),
    RegisterDescriptor::rw(N::ReturnDelayTime, 0x05, 1, 0, 254, true),
    RegisterDescriptor::rw(N::CwAngleLimit, 0x06, 2, 0, 1023, true),
    RegisterDescriptor::rw(N::CcwAngleLimit, 0x08, 2, 0, 1023, true),
    RegisterDescriptor::rw(N::HighestLimitTemperature, 0x0B, 1, 10, 99, true),
    RegisterDescriptor::rw(N::LowestLimitVoltage, 0x0C, 1, 50, 250, true),
    RegisterDescriptor::rw(N::HighestLimitVoltage, 0x0D, 1, 50, 250, true),
    RegisterDescriptor::rw(N::MaxTorque, 0x0E, 2, 0, 1023, true),
    RegisterDescriptor::rw(N::StatusReturnLevel, 0x10, 1, 0, 2, true),
    RegisterDescriptor::rw(N::AlarmLed, 0x11, 1, 0, 127, true),
    RegisterDescriptor::rw(N::AlarmShutdown, 0x12, 1, 0, 127, true),
    // RAM
    RegisterDescriptor::rw(N::TorqueEnable, 0x18, 1, 0, 1, false),
    RegisterDescriptor::rw(N::Led, 0x19, 1, 0, 1, false),
    RegisterDescriptor::rw(N::CwComplianceMargin, 0x1A, 1, 0, 255, true),
    RegisterDescriptor::rw(N::CcwComplianceMargin, 0x1B, 1, 0, 255, true),
    RegisterDescriptor::rw(N::CwComplianceSlope, 0x1C, 1, 1, 254, true),
    RegisterDescriptor::rw(N::CcwComplianceSlope, 0x1D, 1, 1, 254, true),
    RegisterDescriptor::rw(N::GoalPosition, 0x1E, 2, 0, 1023, true),
    RegisterDescriptor::rw(N::MovingSpeed, 0x20, 2, 0, 1023, true),
    RegisterDescriptor::rw(N::TorqueLimit, 0x22, 2, 0, 1023, false),
    RegisterDescriptor::ro(N::PresentPosition, 0x24, 2, 1023, false),
    RegisterDescriptor::ro(N::PresentSpeed, 0x26, 2, 2047, false),
    RegisterDescriptor::ro(N::PresentLoad, 0x28, 2, 2047, false),
    RegisterDescriptor::ro(N::PresentVoltage, 0x2A, 1, 0xFF, false),
    RegisterDescriptor::ro(N::PresentTemperature, 0x2B, 1, 0xFF, false),
    RegisterDescriptor::ro(N::Registered, 0x2C, 1, 1, false),
    RegisterDescriptor::ro(N::Moving, 0x2E, 1, 1, false),
    RegisterDescriptor::rw(N::Lock, 0x2F, 1, 0, 1, true),
    RegisterDescriptor::rw(N::Punch, 0x30, 2, 32, 1023, true),
];

static REGISTERS: [RegisterDescriptor; 32] = CATALOG;

const fn table_size() -> usize {
    let mut size = 0;
    let mut i = 0;
    while i < CATALOG.len() {
        let end = CATALOG[i].end();
        if end > size {
            size = end;
        }
        i += 1;
    }
    size
}

/// Control table size in bytes: the highest register address plus its width.
pub const TABLE_SIZE: usize = table_size();

/// Lookup facade over the static catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisterTable;

impl RegisterTable {
    /// Descriptor for a register.
    #[inline]
    pub fn get(name: RegisterName) -> &'static RegisterDescriptor {
        &REGISTERS[name as usize]
    }

    /// Descriptor for a register by its snake-case name.
    ///
    /// # Errors
    ///
    /// Returns `RegisterError::UnknownRegister` if the name is not in the catalog.
    pub fn lookup(name: &str) -> Result<&'static RegisterDescriptor, RegisterError> {
        name.parse::<RegisterName>().map(Self::get)
    }

    /// Descriptor of the register starting at `address`, if any.
    pub fn at(address: u8) -> Option<&'static RegisterDescriptor> {
        REGISTERS.iter().find(|r| r.address == address)
    }

    /// Iterate over all descriptors in address order.
    pub fn iter() -> impl Iterator<Item = &'static RegisterDescriptor> {
        REGISTERS.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_size() {
        assert_eq!(TABLE_SIZE, 50);
    }

    #[test]
    fn test_catalog_order_matches_names() {
        for (i, name) in RegisterName::ALL.iter().enumerate() {
            assert_eq!(REGISTERS[i].name, *name);
            assert_eq!(RegisterTable::get(*name).name, *name);
        }
    }

    #[test]
    fn test_registers_do_not_overlap() {
        for pair in REGISTERS.windows(2) {
            assert!(
                pair[0].end() <= pair[1].address as usize,
                "{} overlaps {}",
                pair[0].name_str(),
                pair[1].name_str()
            );
        }
    }

    #[test]
    fn test_all_layouts_valid() {
        assert!(RegisterTable::iter().all(|r| r.check_layout().is_ok()));
    }

    #[test]
    fn test_lookup_by_name() {
        let reg = RegisterTable::lookup("goal_position").unwrap();
        assert_eq!(reg.address, 0x1E);
        assert_eq!(reg.width, 2);
        assert_eq!(reg.max, 1023);
    }

    #[test]
    fn test_lookup_unknown() {
        let err = RegisterTable::lookup("warp_drive").unwrap_err();
        assert!(matches!(err, RegisterError::UnknownRegister(ref n) if n.as_str() == "warp_drive"));
    }

    #[test]
    fn test_at_address() {
        assert_eq!(RegisterTable::at(0x2F).map(|r| r.name), Some(RegisterName::Lock));
        assert!(RegisterTable::at(0x0A).is_none());
    }
}
