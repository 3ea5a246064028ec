//! Constants shared by the reporter, the model and the panels.

use crate::enums::LlcName;
use tokio::time::Duration;

/// Maximum jerk in deg/sec^3.
pub const MAX_JERK: f64 = 40.0;
/// Maximum acceleration in deg/sec^2.
pub const MAX_ACCELERATION: f64 = 10.0;
/// Maximum velocity in deg/sec.
pub const MAX_VELOCITY: f64 = 3.5;
/// Maximum position in deg.
pub const MAX_POSITION: f64 = 360.0;

/// Number of sensors of the monitoring control system.
pub const NUM_INTERLOCK: usize = 16;
pub const CBCS_NUM_CAPACITOR_BANKS: usize = 3;
pub const APSCS_NUM_SHUTTERS: usize = 2;
pub const LCS_NUM_LOUVERS: usize = 34;
pub const RAD_NUM_DOORS: usize = 2;

/// Flags reported for every capacitor bank.
pub const CAPACITOR_BANK_FLAGS: [&str; 5] = [
    "fuseIntervention",
    "smokeDetected",
    "highTemperature",
    "lowResidualVoltage",
    "doorOpen",
];

/// Key of the DC bus voltage in the capacitor bank status.
pub const CBCS_DC_BUS_VOLTAGE: &str = "dcBusVoltage";

/// Keys removed from a status before it is reported as telemetry.
pub const KEYS_TO_REMOVE: [&str; 4] = [
    "status",
    "timestamp",
    "operationalMode",
    "appliedConfiguration",
];

/// Human readable names of the subsystems, in `SubSystemId` order.
pub const SUBSYSTEMS: [&str; 10] = [
    "Azimuth Motion Control System",
    "Light and Wind Screen Control System",
    "Aperture Shutter Control System",
    "Louvers Control System",
    "Thermal Control System",
    "Monitoring Control System",
    "Rear Access Door",
    "Calibration Screen Control System",
    "Overhead Bridge Crane",
    "Capacitor Banks Control System",
];

/// Polling period of the status of a lower level component.
///
/// The overhead bridge crane has no status command.
pub fn status_period(llc_name: LlcName) -> Option<Duration> {
    match llc_name {
        LlcName::Amcs => Some(Duration::from_millis(200)),
        LlcName::Apscs
        | LlcName::Cbcs
        | LlcName::Cscs
        | LlcName::Lcs
        | LlcName::Lwscs
        | LlcName::Moncs
        | LlcName::Rad
        | LlcName::Thcs => Some(Duration::from_millis(500)),
        LlcName::Obc => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_period() {
        assert_eq!(
            status_period(LlcName::Amcs),
            Some(Duration::from_millis(200))
        );
        assert_eq!(
            status_period(LlcName::Moncs),
            Some(Duration::from_millis(500))
        );
        assert_eq!(status_period(LlcName::Obc), None);
    }
}
