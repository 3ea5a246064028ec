//! Define the Status struct, the last known discrete state of the dome.

use crate::{
    constants::{CAPACITOR_BANK_FLAGS, CBCS_NUM_CAPACITOR_BANKS, NUM_INTERLOCK},
    enums::SubSystemId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of a state field that has never been reported.
pub const STATE_NOT_REPORTED: i32 = -1;

/// Telemetry of a lower level component, shaped by the schema registry.
pub type Telemetry = serde_json::Map<String, serde_json::Value>;

/// Capacitor bank flags, one boolean per bank for each flag.
pub type CapacitorBank = BTreeMap<String, Vec<bool>>;

/// Motion limits of an axis in degree based units.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    pub jmax: f64,
    pub amax: f64,
    pub vmax: f64,
}

/// Discrete state tracked in `Status::state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SystemStateField {
    /// Bitmask of the engaged locking pins.
    LockingPinsEngaged,
    /// Bitmask of the engaged brakes.
    BrakeEngaged,
    AzimuthAxis,
    ElevationAxis,
    ApertureShutter,
    Louvers,
    RearAccessDoor,
    CalibrationScreen,
    PowerMode,
    ControlMode,
}

impl SystemStateField {
    pub const ALL: [SystemStateField; 10] = [
        SystemStateField::LockingPinsEngaged,
        SystemStateField::BrakeEngaged,
        SystemStateField::AzimuthAxis,
        SystemStateField::ElevationAxis,
        SystemStateField::ApertureShutter,
        SystemStateField::Louvers,
        SystemStateField::RearAccessDoor,
        SystemStateField::CalibrationScreen,
        SystemStateField::PowerMode,
        SystemStateField::ControlMode,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    /// Interlocks, true if latched.
    pub interlocks: Vec<bool>,
    /// Integer code of each discrete state, `STATE_NOT_REPORTED` until the
    /// first report.
    pub state: BTreeMap<SystemStateField, i32>,
    /// Operational mode code of each subsystem, in `SubSystemId` order.
    pub operational_modes: Vec<i32>,
    pub capacitor_bank: CapacitorBank,
    /// Configuration of the azimuth motion control system (AMCS).
    pub config_amcs: MotionConfig,
    /// Configuration of the light and wind screen control system (LWSCS).
    pub config_lwscs: MotionConfig,
}

impl Default for Status {
    fn default() -> Self {
        Status {
            interlocks: vec![false; NUM_INTERLOCK],
            state: SystemStateField::ALL
                .into_iter()
                .map(|field| (field, STATE_NOT_REPORTED))
                .collect(),
            operational_modes: vec![STATE_NOT_REPORTED; SubSystemId::ALL.len()],
            capacitor_bank: default_capacitor_bank(),
            config_amcs: MotionConfig::default(),
            config_lwscs: MotionConfig::default(),
        }
    }
}

impl Status {
    pub fn get_state(&self, field: SystemStateField) -> i32 {
        self.state
            .get(&field)
            .copied()
            .unwrap_or(STATE_NOT_REPORTED)
    }

    pub fn get_operational_mode(&self, subsystem: SubSystemId) -> i32 {
        self.operational_modes[subsystem.index()]
    }
}

/// Capacitor bank with every flag cleared.
pub fn default_capacitor_bank() -> CapacitorBank {
    CAPACITOR_BANK_FLAGS
        .into_iter()
        .map(|flag| (flag.to_owned(), vec![false; CBCS_NUM_CAPACITOR_BANKS]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let status = Status::default();

        assert_eq!(status.interlocks, vec![false; NUM_INTERLOCK]);
        for field in SystemStateField::ALL {
            assert_eq!(status.get_state(field), STATE_NOT_REPORTED);
        }
        assert_eq!(status.operational_modes.len(), SubSystemId::ALL.len());
        assert_eq!(status.capacitor_bank.len(), CAPACITOR_BANK_FLAGS.len());
        assert!(status
            .capacitor_bank
            .values()
            .all(|flags| flags == &vec![false; CBCS_NUM_CAPACITOR_BANKS]));
        assert_eq!(status.config_amcs, MotionConfig::default());
        assert_eq!(status.config_lwscs, MotionConfig::default());
    }
}
