//! Define the MTDome enumerations.
//!
//! The numeric codes match the values published by the dome controller, so
//! they can be stored in the integer based `Status` record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Enabled state of a subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnabledState {
    Disabled,
    Enabled,
    Fault,
}

impl EnabledState {
    pub fn value(&self) -> i32 {
        match self {
            EnabledState::Disabled => 1,
            EnabledState::Enabled => 2,
            EnabledState::Fault => 3,
        }
    }
}

/// Motion state of an axis, shutter door, louver or door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionState {
    Closed,
    Crawling,
    Moving,
    Open,
    Parked,
    Parking,
    Stopped,
    Stopping,
    Error,
    StoppedBraked,
    BrakesDisengaged,
    BrakesEngaged,
    DisengagingBrakes,
    EngagingBrakes,
    LpDisengaged,
    LpDisengaging,
    LpEngaged,
    LpEngaging,
    MotorPowerOff,
    MotorPowerOn,
    GoDegraded,
    GoNormal,
    GoStationary,
    Undetermined,
}

impl MotionState {
    pub const ALL: [MotionState; 24] = [
        MotionState::Closed,
        MotionState::Crawling,
        MotionState::Moving,
        MotionState::Open,
        MotionState::Parked,
        MotionState::Parking,
        MotionState::Stopped,
        MotionState::Stopping,
        MotionState::Error,
        MotionState::StoppedBraked,
        MotionState::BrakesDisengaged,
        MotionState::BrakesEngaged,
        MotionState::DisengagingBrakes,
        MotionState::EngagingBrakes,
        MotionState::LpDisengaged,
        MotionState::LpDisengaging,
        MotionState::LpEngaged,
        MotionState::LpEngaging,
        MotionState::MotorPowerOff,
        MotionState::MotorPowerOn,
        MotionState::GoDegraded,
        MotionState::GoNormal,
        MotionState::GoStationary,
        MotionState::Undetermined,
    ];

    /// Name used by the lower level components.
    pub fn name(&self) -> &'static str {
        match self {
            MotionState::Closed => "CLOSED",
            MotionState::Crawling => "CRAWLING",
            MotionState::Moving => "MOVING",
            MotionState::Open => "OPEN",
            MotionState::Parked => "PARKED",
            MotionState::Parking => "PARKING",
            MotionState::Stopped => "STOPPED",
            MotionState::Stopping => "STOPPING",
            MotionState::Error => "ERROR",
            MotionState::StoppedBraked => "STOPPED_BRAKED",
            MotionState::BrakesDisengaged => "BRAKES_DISENGAGED",
            MotionState::BrakesEngaged => "BRAKES_ENGAGED",
            MotionState::DisengagingBrakes => "DISENGAGING_BRAKES",
            MotionState::EngagingBrakes => "ENGAGING_BRAKES",
            MotionState::LpDisengaged => "LP_DISENGAGED",
            MotionState::LpDisengaging => "LP_DISENGAGING",
            MotionState::LpEngaged => "LP_ENGAGED",
            MotionState::LpEngaging => "LP_ENGAGING",
            MotionState::MotorPowerOff => "MOTOR_POWER_OFF",
            MotionState::MotorPowerOn => "MOTOR_POWER_ON",
            MotionState::GoDegraded => "GO_DEGRADED",
            MotionState::GoNormal => "GO_NORMAL",
            MotionState::GoStationary => "GO_STATIONARY",
            MotionState::Undetermined => "UNDETERMINED",
        }
    }

    pub fn from_name(name: &str) -> Option<MotionState> {
        MotionState::ALL
            .into_iter()
            .find(|motion_state| motion_state.name() == name)
    }
}

impl fmt::Display for MotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationalMode {
    Normal,
    Degraded,
}

impl OperationalMode {
    pub fn value(&self) -> i32 {
        match self {
            OperationalMode::Normal => 1,
            OperationalMode::Degraded => 2,
        }
    }

    pub fn from_name(name: &str) -> Option<OperationalMode> {
        match name {
            "NORMAL" => Some(OperationalMode::Normal),
            "DEGRADED" => Some(OperationalMode::Degraded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerManagementMode {
    NoPowerManagement,
    Operations,
    Emergency,
    Maintenance,
}

impl PowerManagementMode {
    pub fn value(&self) -> i32 {
        match self {
            PowerManagementMode::NoPowerManagement => 1,
            PowerManagementMode::Operations => 2,
            PowerManagementMode::Emergency => 3,
            PowerManagementMode::Maintenance => 4,
        }
    }
}

/// Who is allowed to command the dome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlMode {
    Remote,
    Local,
}

impl ControlMode {
    pub fn value(&self) -> i32 {
        match self {
            ControlMode::Remote => 0,
            ControlMode::Local => 1,
        }
    }
}

/// Public identifier of a dome subsystem.
///
/// The declaration order is the slot order of `Status::operational_modes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubSystemId {
    Amcs,
    Lwscs,
    Apscs,
    Lcs,
    Thcs,
    Moncs,
    Rad,
    Cscs,
    Obc,
    Cbcs,
}

impl SubSystemId {
    pub const ALL: [SubSystemId; 10] = [
        SubSystemId::Amcs,
        SubSystemId::Lwscs,
        SubSystemId::Apscs,
        SubSystemId::Lcs,
        SubSystemId::Thcs,
        SubSystemId::Moncs,
        SubSystemId::Rad,
        SubSystemId::Cscs,
        SubSystemId::Obc,
        SubSystemId::Cbcs,
    ];

    /// Position of the subsystem in `SubSystemId::ALL`.
    pub fn index(&self) -> usize {
        match self {
            SubSystemId::Amcs => 0,
            SubSystemId::Lwscs => 1,
            SubSystemId::Apscs => 2,
            SubSystemId::Lcs => 3,
            SubSystemId::Thcs => 4,
            SubSystemId::Moncs => 5,
            SubSystemId::Rad => 6,
            SubSystemId::Cscs => 7,
            SubSystemId::Obc => 8,
            SubSystemId::Cbcs => 9,
        }
    }
}

/// Name of a lower level component (LLC) in the dome controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LlcName {
    #[serde(rename = "AMCS")]
    Amcs,
    #[serde(rename = "ApSCS")]
    Apscs,
    #[serde(rename = "CBCS")]
    Cbcs,
    #[serde(rename = "CSCS")]
    Cscs,
    #[serde(rename = "LCS")]
    Lcs,
    #[serde(rename = "LWSCS")]
    Lwscs,
    #[serde(rename = "MonCS")]
    Moncs,
    #[serde(rename = "OBC")]
    Obc,
    #[serde(rename = "RAD")]
    Rad,
    #[serde(rename = "ThCS")]
    Thcs,
}

impl LlcName {
    pub const ALL: [LlcName; 10] = [
        LlcName::Amcs,
        LlcName::Apscs,
        LlcName::Cbcs,
        LlcName::Cscs,
        LlcName::Lcs,
        LlcName::Lwscs,
        LlcName::Moncs,
        LlcName::Obc,
        LlcName::Rad,
        LlcName::Thcs,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LlcName::Amcs => "AMCS",
            LlcName::Apscs => "ApSCS",
            LlcName::Cbcs => "CBCS",
            LlcName::Cscs => "CSCS",
            LlcName::Lcs => "LCS",
            LlcName::Lwscs => "LWSCS",
            LlcName::Moncs => "MonCS",
            LlcName::Obc => "OBC",
            LlcName::Rad => "RAD",
            LlcName::Thcs => "ThCS",
        }
    }

    pub fn subsystem_id(&self) -> SubSystemId {
        match self {
            LlcName::Amcs => SubSystemId::Amcs,
            LlcName::Apscs => SubSystemId::Apscs,
            LlcName::Cbcs => SubSystemId::Cbcs,
            LlcName::Cscs => SubSystemId::Cscs,
            LlcName::Lcs => SubSystemId::Lcs,
            LlcName::Lwscs => SubSystemId::Lwscs,
            LlcName::Moncs => SubSystemId::Moncs,
            LlcName::Obc => SubSystemId::Obc,
            LlcName::Rad => SubSystemId::Rad,
            LlcName::Thcs => SubSystemId::Thcs,
        }
    }
}

impl fmt::Display for LlcName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_motion_state_names_round_trip() {
        for motion_state in MotionState::ALL {
            assert_eq!(MotionState::from_name(motion_state.name()), Some(motion_state));
        }

        assert_eq!(MotionState::from_name("STATIONARY"), None);
    }

    #[test]
    fn test_subsystem_index_follows_declaration_order() {
        for (idx, subsystem) in SubSystemId::ALL.iter().enumerate() {
            assert_eq!(subsystem.index(), idx);
        }
    }

    #[test]
    fn test_llc_name_to_subsystem_is_injective() {
        let subsystems: HashSet<SubSystemId> =
            LlcName::ALL.iter().map(|llc_name| llc_name.subsystem_id()).collect();

        assert_eq!(subsystems.len(), LlcName::ALL.len());
    }

    #[test]
    fn test_llc_name_serde_uses_controller_names() {
        let llc_name: LlcName = serde_json::from_str("\"ApSCS\"").unwrap();

        assert_eq!(llc_name, LlcName::Apscs);
        assert_eq!(serde_json::to_string(&LlcName::Moncs).unwrap(), "\"MonCS\"");
    }
}
