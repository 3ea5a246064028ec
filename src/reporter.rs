//! Report the system status to the subscribed panels.
//!
//! The reporter owns the `Status` record and is the only publisher of the
//! `Signals`. Discrete state is published only when it differs from the last
//! value published on its channel; continuous telemetry is published on every
//! report.

use crate::{
    constants::{
        APSCS_NUM_SHUTTERS, CBCS_NUM_CAPACITOR_BANKS, LCS_NUM_LOUVERS, NUM_INTERLOCK,
        RAD_NUM_DOORS,
    },
    enums::{
        ControlMode, EnabledState, MotionState, OperationalMode, PowerManagementMode, SubSystemId,
    },
    error::{MTDomeGuiError, MTDomeGuiResult},
    registry::SchemaRegistry,
    signals::{Signals, TelemetryTopic},
    status::{
        default_capacitor_bank, CapacitorBank, MotionConfig, Status, SystemStateField, Telemetry,
        STATE_NOT_REPORTED,
    },
};
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct Reporter {
    status: Status,
    /// Last value published on each discrete channel. Apart from
    /// `report_default`, it follows `status`.
    published: Status,
    signals: Signals,
    default_telemetry: BTreeMap<TelemetryTopic, Telemetry>,
}

impl Reporter {
    /// Create a reporter.
    ///
    /// The registry shapes the zero valued telemetry published by
    /// `report_default`, so every telemetry topic must be described in it.
    pub fn new(registry: &SchemaRegistry) -> MTDomeGuiResult<Reporter> {
        let default_telemetry = TelemetryTopic::ALL
            .into_iter()
            .map(|topic| {
                registry
                    .generate_dict_from_registry(topic.llc_name().name(), 0.0)
                    .map(|telemetry| (topic, telemetry))
            })
            .collect::<MTDomeGuiResult<_>>()?;

        Ok(Reporter {
            status: Status::default(),
            published: Status::default(),
            signals: Signals::default(),
            default_telemetry,
        })
    }

    pub fn get_status(&self) -> &Status {
        &self.status
    }

    pub fn get_signals(&self) -> &Signals {
        &self.signals
    }

    /// Publish a fixed baseline on every signal.
    ///
    /// This gives every panel something to render before the first poll
    /// completes. The baseline is not an observation of the dome, so the
    /// status record is left untouched. Later reports of a baseline value are
    /// not published again.
    pub fn report_default(&mut self) {
        let signals = &self.signals;

        signals.interlock.interlock.emit(vec![false; NUM_INTERLOCK]);
        signals.interlock.locking_pins_engaged.emit(0);

        signals.state.brake_engaged.emit(0);
        for signal in [
            &signals.state.azimuth_axis,
            &signals.state.elevation_axis,
            &signals.state.aperture_shutter,
            &signals.state.louvers,
            &signals.state.rear_access_door,
            &signals.state.calibration_screen,
        ] {
            signal.emit(EnabledState::Disabled);
        }
        signals
            .state
            .power_mode
            .emit(PowerManagementMode::NoPowerManagement);
        signals.state.control_mode.emit(ControlMode::Remote);

        for subsystem in SubSystemId::ALL {
            signals
                .operational_mode
                .subsystem_mode
                .emit((subsystem, OperationalMode::Normal));
        }

        signals.telemetry.cbcs.emit(default_capacitor_bank());
        signals.telemetry.cbcs_voltage.emit(0.0);
        for (topic, telemetry) in &self.default_telemetry {
            self.report_telemetry(*topic, telemetry.clone());
        }

        self.report_target_azimuth(0.0, 0.0);
        self.report_target_elevation(0.0, 0.0);

        self.report_motion_azimuth_axis(MotionState::Stopped, false);
        self.report_motion_elevation_axis(MotionState::Stopped, false);
        self.report_motion_aperture_shutter(
            vec![MotionState::Stopped; APSCS_NUM_SHUTTERS],
            vec![false; APSCS_NUM_SHUTTERS],
        );
        self.report_motion_louvers(
            vec![MotionState::Stopped; LCS_NUM_LOUVERS],
            vec![false; LCS_NUM_LOUVERS],
        );
        self.report_motion_rear_access_door(
            vec![MotionState::Stopped; RAD_NUM_DOORS],
            vec![false; RAD_NUM_DOORS],
        );
        self.report_motion_calibration_screen(MotionState::Stopped, false);

        for signal in [
            &signals.fault_code.azimuth_axis,
            &signals.fault_code.elevation_axis,
            &signals.fault_code.aperture_shutter,
            &signals.fault_code.louvers,
            &signals.fault_code.rear_access_door,
            &signals.fault_code.calibration_screen,
        ] {
            signal.emit(String::new());
        }

        signals.config.amcs.emit(MotionConfig::default());
        signals.config.lwscs.emit(MotionConfig::default());

        self.published = baseline_status();
    }

    /// Report the interlocks, true if latched.
    pub fn report_interlocks(&mut self, interlocks: Vec<bool>) -> MTDomeGuiResult<()> {
        if interlocks.len() != NUM_INTERLOCK {
            return Err(MTDomeGuiError::invalid_input(&format!(
                "Got {} interlocks; expected {NUM_INTERLOCK}.",
                interlocks.len()
            )));
        }

        if check_and_update(
            &mut self.status.interlocks,
            &mut self.published.interlocks,
            &interlocks,
        ) {
            self.signals.interlock.interlock.emit(interlocks);
        }
        Ok(())
    }

    /// Update a state field and return true if the value has to be
    /// published.
    fn check_system_state(&mut self, field: SystemStateField, value: i32) -> bool {
        self.status.state.insert(field, value);
        let published = self
            .published
            .state
            .entry(field)
            .or_insert(STATE_NOT_REPORTED);
        if *published == value {
            return false;
        }
        *published = value;
        true
    }

    /// Report the bitmask of the engaged locking pins.
    pub fn report_state_locking_pins_engaged(&mut self, engaged_pins: i32) {
        if self.check_system_state(SystemStateField::LockingPinsEngaged, engaged_pins) {
            self.signals.interlock.locking_pins_engaged.emit(engaged_pins);
        }
    }

    /// Report the bitmask of the engaged brakes.
    pub fn report_state_brake_engaged(&mut self, brakes: i32) {
        if self.check_system_state(SystemStateField::BrakeEngaged, brakes) {
            self.signals.state.brake_engaged.emit(brakes);
        }
    }

    pub fn report_state_azimuth_axis(&mut self, state: EnabledState) {
        if self.check_system_state(SystemStateField::AzimuthAxis, state.value()) {
            self.signals.state.azimuth_axis.emit(state);
        }
    }

    pub fn report_state_elevation_axis(&mut self, state: EnabledState) {
        if self.check_system_state(SystemStateField::ElevationAxis, state.value()) {
            self.signals.state.elevation_axis.emit(state);
        }
    }

    pub fn report_state_aperture_shutter(&mut self, state: EnabledState) {
        if self.check_system_state(SystemStateField::ApertureShutter, state.value()) {
            self.signals.state.aperture_shutter.emit(state);
        }
    }

    pub fn report_state_louvers(&mut self, state: EnabledState) {
        if self.check_system_state(SystemStateField::Louvers, state.value()) {
            self.signals.state.louvers.emit(state);
        }
    }

    pub fn report_state_rear_access_door(&mut self, state: EnabledState) {
        if self.check_system_state(SystemStateField::RearAccessDoor, state.value()) {
            self.signals.state.rear_access_door.emit(state);
        }
    }

    pub fn report_state_calibration_screen(&mut self, state: EnabledState) {
        if self.check_system_state(SystemStateField::CalibrationScreen, state.value()) {
            self.signals.state.calibration_screen.emit(state);
        }
    }

    pub fn report_state_power_mode(&mut self, mode: PowerManagementMode) {
        if self.check_system_state(SystemStateField::PowerMode, mode.value()) {
            self.signals.state.power_mode.emit(mode);
        }
    }

    pub fn report_state_control_mode(&mut self, mode: ControlMode) {
        if self.check_system_state(SystemStateField::ControlMode, mode.value()) {
            self.signals.state.control_mode.emit(mode);
        }
    }

    pub fn report_operational_mode(&mut self, subsystem: SubSystemId, mode: OperationalMode) {
        let index = subsystem.index();
        if check_and_update(
            &mut self.status.operational_modes[index],
            &mut self.published.operational_modes[index],
            &mode.value(),
        ) {
            self.signals
                .operational_mode
                .subsystem_mode
                .emit((subsystem, mode));
        }
    }

    /// Report the capacitor bank.
    ///
    /// The DC bus voltage (in Volt) is published on every call; the flags
    /// only when any of them changed.
    pub fn report_capacitor_bank(
        &mut self,
        dc_bus_voltage: f64,
        capacitor_bank: CapacitorBank,
    ) -> MTDomeGuiResult<()> {
        if let Some((flag, values)) = capacitor_bank
            .iter()
            .find(|(_, values)| values.len() != CBCS_NUM_CAPACITOR_BANKS)
        {
            return Err(MTDomeGuiError::invalid_input(&format!(
                "Got {} values for {flag}; expected {CBCS_NUM_CAPACITOR_BANKS}.",
                values.len()
            )));
        }

        self.signals.telemetry.cbcs_voltage.emit(dc_bus_voltage);

        if check_and_update(
            &mut self.status.capacitor_bank,
            &mut self.published.capacitor_bank,
            &capacitor_bank,
        ) {
            self.signals.telemetry.cbcs.emit(capacitor_bank);
        }
        Ok(())
    }

    /// Report the configuration of the azimuth motion control system (AMCS).
    pub fn report_config_azimuth(&mut self, config: MotionConfig) {
        if check_and_update(
            &mut self.status.config_amcs,
            &mut self.published.config_amcs,
            &config,
        ) {
            self.signals.config.amcs.emit(config);
        }
    }

    /// Report the configuration of the light and wind screen control system
    /// (LWSCS).
    pub fn report_config_elevation(&mut self, config: MotionConfig) {
        if check_and_update(
            &mut self.status.config_lwscs,
            &mut self.published.config_lwscs,
            &config,
        ) {
            self.signals.config.lwscs.emit(config);
        }
    }

    pub fn report_telemetry(&self, topic: TelemetryTopic, telemetry: Telemetry) {
        self.signals.telemetry.topic(topic).emit(telemetry);
    }

    /// Report the azimuth target in deg and deg/sec.
    pub fn report_target_azimuth(&self, position: f64, velocity: f64) {
        self.signals
            .target
            .position_velocity_azimuth
            .emit((position, velocity));
    }

    /// Report the elevation target in deg and deg/sec.
    pub fn report_target_elevation(&self, position: f64, velocity: f64) {
        self.signals
            .target
            .position_velocity_elevation
            .emit((position, velocity));
    }

    pub fn report_motion_azimuth_axis(&self, motion_state: MotionState, in_position: bool) {
        self.signals
            .motion
            .azimuth_axis
            .emit((motion_state, in_position));
    }

    pub fn report_motion_elevation_axis(&self, motion_state: MotionState, in_position: bool) {
        self.signals
            .motion
            .elevation_axis
            .emit((motion_state, in_position));
    }

    pub fn report_motion_aperture_shutter(
        &self,
        motion_states: Vec<MotionState>,
        in_positions: Vec<bool>,
    ) {
        self.signals
            .motion
            .aperture_shutter
            .emit((motion_states, in_positions));
    }

    pub fn report_motion_louvers(&self, motion_states: Vec<MotionState>, in_positions: Vec<bool>) {
        self.signals
            .motion
            .louvers
            .emit((motion_states, in_positions));
    }

    pub fn report_motion_rear_access_door(
        &self,
        motion_states: Vec<MotionState>,
        in_positions: Vec<bool>,
    ) {
        self.signals
            .motion
            .rear_access_door
            .emit((motion_states, in_positions));
    }

    pub fn report_motion_calibration_screen(&self, motion_state: MotionState, in_position: bool) {
        self.signals
            .motion
            .calibration_screen
            .emit((motion_state, in_position));
    }

    pub fn report_fault_code_azimuth_axis(&self, fault_code: &str) {
        self.signals
            .fault_code
            .azimuth_axis
            .emit(fault_code.to_owned());
    }

    pub fn report_fault_code_elevation_axis(&self, fault_code: &str) {
        self.signals
            .fault_code
            .elevation_axis
            .emit(fault_code.to_owned());
    }

    pub fn report_fault_code_aperture_shutter(&self, fault_code: &str) {
        self.signals
            .fault_code
            .aperture_shutter
            .emit(fault_code.to_owned());
    }

    pub fn report_fault_code_louvers(&self, fault_code: &str) {
        self.signals.fault_code.louvers.emit(fault_code.to_owned());
    }

    pub fn report_fault_code_rear_access_door(&self, fault_code: &str) {
        self.signals
            .fault_code
            .rear_access_door
            .emit(fault_code.to_owned());
    }

    pub fn report_fault_code_calibration_screen(&self, fault_code: &str) {
        self.signals
            .fault_code
            .calibration_screen
            .emit(fault_code.to_owned());
    }
}

/// Store `value` in the status and return true if it differs from the last
/// published one, which then becomes `value`.
fn check_and_update<T: Clone + PartialEq>(current: &mut T, published: &mut T, value: &T) -> bool {
    *current = value.clone();
    if published == value {
        return false;
    }
    *published = value.clone();
    true
}

/// Discrete values published by `report_default`.
fn baseline_status() -> Status {
    let mut status = Status {
        operational_modes: vec![OperationalMode::Normal.value(); SubSystemId::ALL.len()],
        ..Status::default()
    };
    for (field, value) in [
        (SystemStateField::LockingPinsEngaged, 0),
        (SystemStateField::BrakeEngaged, 0),
        (SystemStateField::AzimuthAxis, EnabledState::Disabled.value()),
        (SystemStateField::ElevationAxis, EnabledState::Disabled.value()),
        (SystemStateField::ApertureShutter, EnabledState::Disabled.value()),
        (SystemStateField::Louvers, EnabledState::Disabled.value()),
        (SystemStateField::RearAccessDoor, EnabledState::Disabled.value()),
        (SystemStateField::CalibrationScreen, EnabledState::Disabled.value()),
        (
            SystemStateField::PowerMode,
            PowerManagementMode::NoPowerManagement.value(),
        ),
        (SystemStateField::ControlMode, ControlMode::Remote.value()),
    ] {
        status.state.insert(field, value);
    }
    status
}
