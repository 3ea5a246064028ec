//! Classify the status of the lower level components and report it.

use crate::{
    constants::{CAPACITOR_BANK_FLAGS, CBCS_DC_BUS_VOLTAGE, KEYS_TO_REMOVE},
    dome_com::LlcStatus,
    enums::{EnabledState, LlcName, MotionState, OperationalMode},
    error::{MTDomeGuiError, MTDomeGuiResult},
    reporter::Reporter,
    signals::TelemetryTopic,
    status::{CapacitorBank, MotionConfig},
};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Entry of the `messages` list of a lower level component status.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusMessage {
    pub code: i64,
    pub description: String,
}

/// Motion states that count as "in position" for the azimuth axis.
const IN_POSITION_AZIMUTH: [MotionState; 4] = [
    MotionState::Stopped,
    MotionState::StoppedBraked,
    MotionState::Crawling,
    MotionState::Parked,
];

const IN_POSITION_ELEVATION: [MotionState; 3] = [
    MotionState::Stopped,
    MotionState::StoppedBraked,
    MotionState::Crawling,
];

const IN_POSITION_APERTURE_SHUTTER: [MotionState; 2] =
    [MotionState::Stopped, MotionState::StoppedBraked];

/// A status without errors has exactly one message, with code 0.
pub fn has_error(messages: &[StatusMessage]) -> bool {
    messages.len() != 1 || messages[0].code != 0
}

/// Fault code reported for the messages, empty if there is no error.
pub fn get_fault_code(messages: &[StatusMessage]) -> String {
    if !has_error(messages) {
        return String::new();
    }

    messages
        .iter()
        .map(|message| format!("{}={}", message.code, message.description))
        .collect::<Vec<String>>()
        .join(", ")
}

/// Translate a motion state label, accepting the legacy labels of the
/// controller.
pub fn translate_motion_state(label: &str) -> Option<MotionState> {
    if let Some(motion_state) = MotionState::from_name(label) {
        return Some(motion_state);
    }

    let motion_state = match label {
        "STATIONARY" => Some(MotionState::StoppedBraked),
        "MOVING_CW" | "MOVING_CCW" => Some(MotionState::Moving),
        "CRAWLING_CW" | "CRAWLING_CCW" => Some(MotionState::Crawling),
        _ => None,
    };
    if motion_state.is_none() {
        log::error!("Unknown motion state: {label:?}");
    }
    motion_state
}

/// Turn the raw status of a lower level component into reports.
///
/// The classifier owns the reporter, so every report goes through a single
/// writer of the status record.
#[derive(Debug)]
pub struct StatusClassifier {
    reporter: Reporter,
}

impl StatusClassifier {
    pub fn new(reporter: Reporter) -> StatusClassifier {
        StatusClassifier { reporter }
    }

    pub fn get_reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn get_reporter_mut(&mut self) -> &mut Reporter {
        &mut self.reporter
    }

    /// Report the status of one lower level component.
    ///
    /// Returns an error if the status does not have the expected shape; the
    /// reports issued before the error are kept.
    pub fn report_llc_status(
        &mut self,
        llc_name: LlcName,
        mut status: LlcStatus,
    ) -> MTDomeGuiResult<()> {
        let inner_status = match status.get("status") {
            Some(Value::Object(inner_status)) => Some(inner_status.clone()),
            Some(other) => {
                return Err(MTDomeGuiError::invalid_input(&format!(
                    "Status of {llc_name} is not an object: {other}."
                )))
            }
            None => None,
        };

        if let Some(inner_status) = &inner_status {
            self.report_operational_mode(llc_name, inner_status)?;
        }
        self.report_configuration(llc_name, &status)?;

        match (llc_name, &inner_status) {
            (LlcName::Amcs, Some(inner_status)) => {
                self.check_errors_and_report_azimuth(inner_status)?
            }
            (LlcName::Lwscs, Some(inner_status)) => {
                self.check_errors_and_report_elevation(inner_status)?
            }
            (LlcName::Apscs, Some(inner_status)) => {
                self.check_errors_and_report_aperture_shutter(inner_status)?
            }
            (LlcName::Amcs | LlcName::Lwscs | LlcName::Apscs, None) => {
                return Err(MTDomeGuiError::invalid_input(&format!(
                    "Status of {llc_name} has no status field."
                )))
            }
            _ => {}
        }

        for key in KEYS_TO_REMOVE {
            status.remove(key);
        }

        match llc_name {
            LlcName::Moncs => {
                let interlocks = get_interlocks(&status)?;
                self.reporter.report_interlocks(interlocks)
            }
            LlcName::Cbcs => {
                let (dc_bus_voltage, capacitor_bank) = get_capacitor_bank(&status)?;
                self.reporter
                    .report_capacitor_bank(dc_bus_voltage, capacitor_bank)
            }
            LlcName::Obc => {
                log::debug!("No telemetry is reported for {llc_name}.");
                Ok(())
            }
            _ => {
                if let Some(topic) = TelemetryTopic::from_llc_name(llc_name) {
                    self.reporter.report_telemetry(topic, status);
                }
                Ok(())
            }
        }
    }

    fn report_operational_mode(
        &mut self,
        llc_name: LlcName,
        inner_status: &Map<String, Value>,
    ) -> MTDomeGuiResult<()> {
        let Some(mode) = inner_status.get("operationalMode") else {
            return Ok(());
        };

        let operational_mode = mode
            .as_str()
            .and_then(OperationalMode::from_name)
            .ok_or_else(|| {
                MTDomeGuiError::invalid_input(&format!(
                    "Unknown operational mode of {llc_name}: {mode}."
                ))
            })?;

        self.reporter
            .report_operational_mode(llc_name.subsystem_id(), operational_mode);
        Ok(())
    }

    fn report_configuration(
        &mut self,
        llc_name: LlcName,
        status: &LlcStatus,
    ) -> MTDomeGuiResult<()> {
        let Some(configuration) = status.get("appliedConfiguration") else {
            return Ok(());
        };

        let in_radian: MotionConfig = serde_json::from_value(configuration.clone())?;
        let config = MotionConfig {
            jmax: in_radian.jmax.to_degrees(),
            amax: in_radian.amax.to_degrees(),
            vmax: in_radian.vmax.to_degrees(),
        };

        match llc_name {
            LlcName::Amcs => self.reporter.report_config_azimuth(config),
            LlcName::Lwscs => self.reporter.report_config_elevation(config),
            _ => log::debug!("Ignore the applied configuration of {llc_name}."),
        }
        Ok(())
    }

    fn check_errors_and_report_azimuth(
        &mut self,
        inner_status: &Map<String, Value>,
    ) -> MTDomeGuiResult<()> {
        let messages = get_messages(inner_status)?;
        let has_fault = has_error(&messages);

        self.reporter.report_state_azimuth_axis(enabled_state(has_fault));
        self.reporter
            .report_fault_code_azimuth_axis(&get_fault_code(&messages));

        if !has_fault {
            if let Some(motion_state) = get_motion_label(inner_status)?
                .and_then(translate_motion_state)
            {
                self.reporter.report_motion_azimuth_axis(
                    motion_state,
                    IN_POSITION_AZIMUTH.contains(&motion_state),
                );
            }
        }
        Ok(())
    }

    fn check_errors_and_report_elevation(
        &mut self,
        inner_status: &Map<String, Value>,
    ) -> MTDomeGuiResult<()> {
        let messages = get_messages(inner_status)?;
        let has_fault = has_error(&messages);

        self.reporter
            .report_state_elevation_axis(enabled_state(has_fault));
        self.reporter
            .report_fault_code_elevation_axis(&get_fault_code(&messages));

        if !has_fault {
            if let Some(motion_state) = get_motion_label(inner_status)?
                .and_then(translate_motion_state)
            {
                self.reporter.report_motion_elevation_axis(
                    motion_state,
                    IN_POSITION_ELEVATION.contains(&motion_state),
                );
            }
        }
        Ok(())
    }

    fn check_errors_and_report_aperture_shutter(
        &mut self,
        inner_status: &Map<String, Value>,
    ) -> MTDomeGuiResult<()> {
        let messages = get_messages(inner_status)?;
        let has_fault = has_error(&messages);

        self.reporter
            .report_state_aperture_shutter(enabled_state(has_fault));
        self.reporter
            .report_fault_code_aperture_shutter(&get_fault_code(&messages));

        if has_fault {
            return Ok(());
        }

        let labels: Vec<String> = match inner_status.get("status") {
            Some(labels) => serde_json::from_value(labels.clone())?,
            None => return Ok(()),
        };

        // One unknown label drops the report of every door.
        let Some(motion_states) = labels
            .iter()
            .map(|label| translate_motion_state(label))
            .collect::<Option<Vec<MotionState>>>()
        else {
            return Ok(());
        };

        let in_positions = motion_states
            .iter()
            .map(|motion_state| IN_POSITION_APERTURE_SHUTTER.contains(motion_state))
            .collect();
        self.reporter
            .report_motion_aperture_shutter(motion_states, in_positions);
        Ok(())
    }
}

fn enabled_state(has_error: bool) -> EnabledState {
    if has_error {
        EnabledState::Fault
    } else {
        EnabledState::Enabled
    }
}

fn get_messages(inner_status: &Map<String, Value>) -> MTDomeGuiResult<Vec<StatusMessage>> {
    let messages = inner_status
        .get("messages")
        .ok_or_else(|| MTDomeGuiError::invalid_input("Status has no messages."))?;
    Ok(serde_json::from_value(messages.clone())?)
}

fn get_motion_label(inner_status: &Map<String, Value>) -> MTDomeGuiResult<Option<&str>> {
    match inner_status.get("status") {
        Some(Value::String(label)) => Ok(Some(label)),
        Some(other) => Err(MTDomeGuiError::invalid_input(&format!(
            "Motion state is not a string: {other}."
        ))),
        None => Ok(None),
    }
}

/// Read a value as a boolean, where any non-zero number is true.
fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|number| number != 0.0),
        _ => None,
    }
}

fn get_interlocks(status: &LlcStatus) -> MTDomeGuiResult<Vec<bool>> {
    status
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| MTDomeGuiError::invalid_input("Monitoring status has no data array."))?
        .iter()
        .map(|value| {
            as_bool(value).ok_or_else(|| {
                MTDomeGuiError::invalid_input(&format!("Interlock is not a flag: {value}."))
            })
        })
        .collect()
}

fn get_capacitor_bank(status: &LlcStatus) -> MTDomeGuiResult<(f64, CapacitorBank)> {
    let dc_bus_voltage = status
        .get(CBCS_DC_BUS_VOLTAGE)
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            MTDomeGuiError::invalid_input(&format!(
                "Capacitor bank status has no {CBCS_DC_BUS_VOLTAGE}."
            ))
        })?;

    let mut capacitor_bank = CapacitorBank::new();
    for flag in CAPACITOR_BANK_FLAGS {
        let values = status
            .get(flag)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                MTDomeGuiError::invalid_input(&format!("Capacitor bank status has no {flag}."))
            })?
            .iter()
            .map(as_bool)
            .collect::<Option<Vec<bool>>>()
            .ok_or_else(|| {
                MTDomeGuiError::invalid_input(&format!(
                    "Capacitor bank {flag} has a value that is not a flag."
                ))
            })?;
        capacitor_bank.insert(flag.to_owned(), values);
    }

    Ok((dc_bus_voltage, capacitor_bank))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::NUM_INTERLOCK,
        enums::SubSystemId,
        error::ErrorKind,
        registry::SchemaRegistry,
        status::{SystemStateField, STATE_NOT_REPORTED},
    };
    use log::{Level, LevelFilter};
    use rstest::{fixture, rstest};
    use serde_json::json;
    use std::sync::{Mutex, Once};

    #[fixture]
    fn classifier() -> StatusClassifier {
        StatusClassifier::new(Reporter::new(&SchemaRegistry::bundled().unwrap()).unwrap())
    }

    fn to_status(value: Value) -> LlcStatus {
        match value {
            Value::Object(status) => status,
            _ => panic!("Expected an object."),
        }
    }

    fn no_error() -> Value {
        json!([{"code": 0, "description": "No Errors"}])
    }

    #[rstest]
    #[case::no_errors(vec![(0, "No Errors")], false, "")]
    #[case::empty(vec![], true, "")]
    #[case::one_error(vec![(1, "Errors 1")], true, "1=Errors 1")]
    #[case::two_errors(vec![(1, "Errors 1"), (2, "Errors 2")], true, "1=Errors 1, 2=Errors 2")]
    fn test_fault_code(
        #[case] messages: Vec<(i64, &str)>,
        #[case] expected_has_error: bool,
        #[case] expected_fault_code: &str,
    ) {
        let messages: Vec<StatusMessage> = messages
            .into_iter()
            .map(|(code, description)| StatusMessage {
                code,
                description: description.to_owned(),
            })
            .collect();

        assert_eq!(has_error(&messages), expected_has_error);
        assert_eq!(get_fault_code(&messages), expected_fault_code);
    }

    #[rstest]
    #[case("STOPPED", Some(MotionState::Stopped))]
    #[case("PARKED", Some(MotionState::Parked))]
    #[case("STATIONARY", Some(MotionState::StoppedBraked))]
    #[case("MOVING_CW", Some(MotionState::Moving))]
    #[case("MOVING_CCW", Some(MotionState::Moving))]
    #[case("CRAWLING_CW", Some(MotionState::Crawling))]
    #[case("CRAWLING_CCW", Some(MotionState::Crawling))]
    #[case("Unknown", None)]
    fn test_translate_motion_state(#[case] label: &str, #[case] expected: Option<MotionState>) {
        assert_eq!(translate_motion_state(label), expected);
    }

    /// Keeps every log record of the test binary.
    struct RecordingLogger {
        records: Mutex<Vec<(Level, String)>>,
    }

    impl log::Log for RecordingLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    static LOGGER: RecordingLogger = RecordingLogger {
        records: Mutex::new(Vec::new()),
    };

    fn install_logger() {
        static INSTALL: Once = Once::new();
        INSTALL.call_once(|| {
            log::set_logger(&LOGGER).unwrap();
            log::set_max_level(LevelFilter::Trace);
        });
    }

    /// Number of records at `level` mentioning `text`. Other tests log
    /// concurrently, so records are told apart by their content.
    fn count_logged(level: Level, text: &str) -> usize {
        LOGGER
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|(record_level, message)| *record_level == level && message.contains(text))
            .count()
    }

    #[test]
    fn test_translate_motion_state_logs_unknown_label() {
        install_logger();

        assert_eq!(translate_motion_state("SPINNING_WIDDERSHINS"), None);
        assert_eq!(
            translate_motion_state("MOVING_CW"),
            Some(MotionState::Moving)
        );

        assert_eq!(count_logged(Level::Error, "SPINNING_WIDDERSHINS"), 1);
        assert_eq!(count_logged(Level::Error, "MOVING_CW"), 0);
    }

    #[rstest]
    #[case::stopped("STOPPED", true, true)]
    #[case::braked("STOPPED_BRAKED", true, true)]
    #[case::crawling("CRAWLING", true, true)]
    #[case::parked("PARKED", true, false)]
    #[case::moving("MOVING", false, false)]
    fn test_in_position(
        mut classifier: StatusClassifier,
        #[case] label: &str,
        #[case] azimuth_in_position: bool,
        #[case] elevation_in_position: bool,
    ) {
        let signals = classifier.get_reporter().get_signals().clone();
        let mut receiver_azimuth = signals.motion.azimuth_axis.subscribe();
        let mut receiver_elevation = signals.motion.elevation_axis.subscribe();
        let motion_state = translate_motion_state(label).unwrap();

        for llc_name in [LlcName::Amcs, LlcName::Lwscs] {
            classifier
                .report_llc_status(
                    llc_name,
                    to_status(json!({"status": {"messages": no_error(), "status": label}})),
                )
                .unwrap();
        }

        assert_eq!(
            receiver_azimuth.try_recv().unwrap(),
            (motion_state, azimuth_in_position)
        );
        assert_eq!(
            receiver_elevation.try_recv().unwrap(),
            (motion_state, elevation_in_position)
        );
    }

    #[rstest]
    fn test_report_amcs(mut classifier: StatusClassifier) {
        let signals = classifier.get_reporter().get_signals().clone();
        let mut receiver_config = signals.config.amcs.subscribe();
        let mut receiver_motion = signals.motion.azimuth_axis.subscribe();
        let mut receiver_fault_code = signals.fault_code.azimuth_axis.subscribe();
        let mut receiver_telemetry = signals.telemetry.amcs.subscribe();
        let mut receiver_mode = signals.operational_mode.subsystem_mode.subscribe();

        let status = to_status(json!({
            "status": {
                "messages": no_error(),
                "status": "STOPPED",
                "operationalMode": "DEGRADED",
            },
            "appliedConfiguration": {"jmax": 1.0, "amax": 2.0, "vmax": 3.0},
            "positionActual": 0.5,
            "timestamp": 12.0,
        }));

        classifier.report_llc_status(LlcName::Amcs, status).unwrap();

        let config = receiver_config.try_recv().unwrap();
        assert!((config.jmax - 57.30).abs() < 0.01);
        assert!((config.amax - 114.59).abs() < 0.01);
        assert!((config.vmax - 171.89).abs() < 0.01);

        assert_eq!(
            receiver_motion.try_recv().unwrap(),
            (MotionState::Stopped, true)
        );
        assert_eq!(receiver_fault_code.try_recv().unwrap(), "");
        assert_eq!(
            receiver_mode.try_recv().unwrap(),
            (SubSystemId::Amcs, OperationalMode::Degraded)
        );

        let telemetry = receiver_telemetry.try_recv().unwrap();
        assert_eq!(telemetry.len(), 1);
        assert_eq!(telemetry["positionActual"], 0.5);

        let status = classifier.get_reporter().get_status();
        assert_eq!(
            status.get_state(SystemStateField::AzimuthAxis),
            EnabledState::Enabled.value()
        );
        assert_eq!(status.config_amcs, config);
    }

    #[rstest]
    fn test_report_amcs_fault(mut classifier: StatusClassifier) {
        let signals = classifier.get_reporter().get_signals().clone();
        let mut receiver_state = signals.state.azimuth_axis.subscribe();
        let mut receiver_fault_code = signals.fault_code.azimuth_axis.subscribe();
        let mut receiver_motion = signals.motion.azimuth_axis.subscribe();

        let status = to_status(json!({
            "status": {
                "messages": [
                    {"code": 1, "description": "Errors 1"},
                    {"code": 2, "description": "Errors 2"},
                ],
                "status": "MOVING",
            },
        }));

        classifier.report_llc_status(LlcName::Amcs, status).unwrap();

        assert_eq!(receiver_state.try_recv().unwrap(), EnabledState::Fault);
        assert_eq!(
            receiver_fault_code.try_recv().unwrap(),
            "1=Errors 1, 2=Errors 2"
        );
        assert!(receiver_motion.try_recv().is_err());
    }

    #[rstest]
    fn test_report_unknown_motion_state(mut classifier: StatusClassifier) {
        let mut receiver_motion = classifier
            .get_reporter()
            .get_signals()
            .motion
            .elevation_axis
            .subscribe();

        let status = to_status(json!({
            "status": {"messages": no_error(), "status": "Unknown"},
        }));

        classifier.report_llc_status(LlcName::Lwscs, status).unwrap();

        assert!(receiver_motion.try_recv().is_err());
        assert_eq!(
            classifier
                .get_reporter()
                .get_status()
                .get_state(SystemStateField::ElevationAxis),
            EnabledState::Enabled.value()
        );
    }

    #[rstest]
    fn test_report_aperture_shutter(mut classifier: StatusClassifier) {
        let mut receiver_motion = classifier
            .get_reporter()
            .get_signals()
            .motion
            .aperture_shutter
            .subscribe();

        let status = to_status(json!({
            "status": {"messages": no_error(), "status": ["STOPPED", "MOVING"]},
        }));
        classifier.report_llc_status(LlcName::Apscs, status).unwrap();

        assert_eq!(
            receiver_motion.try_recv().unwrap(),
            (
                vec![MotionState::Stopped, MotionState::Moving],
                vec![true, false]
            )
        );

        // A parked shutter is not in position.
        let status = to_status(json!({
            "status": {"messages": no_error(), "status": ["PARKED", "STATIONARY"]},
        }));
        classifier.report_llc_status(LlcName::Apscs, status).unwrap();

        assert_eq!(
            receiver_motion.try_recv().unwrap(),
            (
                vec![MotionState::Parked, MotionState::StoppedBraked],
                vec![false, true]
            )
        );
    }

    #[rstest]
    fn test_report_aperture_shutter_unknown_label(mut classifier: StatusClassifier) {
        let mut receiver_motion = classifier
            .get_reporter()
            .get_signals()
            .motion
            .aperture_shutter
            .subscribe();

        let status = to_status(json!({
            "status": {"messages": no_error(), "status": ["STOPPED", "Unknown"]},
        }));
        classifier.report_llc_status(LlcName::Apscs, status).unwrap();

        assert!(receiver_motion.try_recv().is_err());
    }

    #[rstest]
    fn test_report_unknown_operational_mode(mut classifier: StatusClassifier) {
        let status = to_status(json!({
            "status": {"messages": no_error(), "operationalMode": "FAST"},
        }));

        let error = classifier
            .report_llc_status(LlcName::Lcs, status)
            .unwrap_err();

        assert_eq!(error.get_kind(), ErrorKind::InvalidInput);
        assert_eq!(
            classifier
                .get_reporter()
                .get_status()
                .get_operational_mode(SubSystemId::Lcs),
            STATE_NOT_REPORTED
        );
    }

    #[rstest]
    fn test_report_monitoring(mut classifier: StatusClassifier) {
        let mut receiver = classifier
            .get_reporter()
            .get_signals()
            .interlock
            .interlock
            .subscribe();

        let mut data = vec![json!(0.0); NUM_INTERLOCK];
        data[1] = json!(1.0);
        data[2] = json!(true);
        let status = to_status(json!({
            "status": {"messages": no_error(), "operationalMode": "NORMAL"},
            "data": data,
            "timestamp": 1.0,
        }));

        classifier.report_llc_status(LlcName::Moncs, status).unwrap();

        let interlocks = receiver.try_recv().unwrap();
        assert_eq!(interlocks.len(), NUM_INTERLOCK);
        assert_eq!(&interlocks[..3], &[false, true, true]);
    }

    #[rstest]
    fn test_report_monitoring_wrong_length(mut classifier: StatusClassifier) {
        let status = to_status(json!({"data": [0.0, 1.0]}));

        assert!(classifier.report_llc_status(LlcName::Moncs, status).is_err());
    }

    #[rstest]
    fn test_report_capacitor_bank(mut classifier: StatusClassifier) {
        let signals = classifier.get_reporter().get_signals().clone();
        let mut receiver_bank = signals.telemetry.cbcs.subscribe();
        let mut receiver_voltage = signals.telemetry.cbcs_voltage.subscribe();

        let status = to_status(json!({
            "status": {"messages": no_error()},
            "fuseIntervention": [0.0, 1.0, 0.0],
            "smokeDetected": [false, false, true],
            "highTemperature": [false, false, false],
            "lowResidualVoltage": [false, false, false],
            "doorOpen": [false, false, false],
            "dcBusVoltage": 800.0,
            "timestamp": 1.0,
        }));

        classifier.report_llc_status(LlcName::Cbcs, status).unwrap();

        let capacitor_bank = receiver_bank.try_recv().unwrap();
        assert_eq!(capacitor_bank["fuseIntervention"], vec![false, true, false]);
        assert_eq!(capacitor_bank["smokeDetected"], vec![false, false, true]);
        assert!(!capacitor_bank.contains_key(CBCS_DC_BUS_VOLTAGE));
        assert_eq!(receiver_voltage.try_recv().unwrap(), 800.0);
    }

    #[rstest]
    fn test_report_telemetry_strips_keys(mut classifier: StatusClassifier) {
        let mut receiver = classifier
            .get_reporter()
            .get_signals()
            .telemetry
            .thcs
            .subscribe();
        let mut receiver_state = classifier
            .get_reporter()
            .get_signals()
            .state
            .louvers
            .subscribe();

        let status = to_status(json!({
            "status": {"messages": no_error(), "operationalMode": "NORMAL"},
            "temperature": [1.0, 2.0],
            "timestamp": 1.0,
        }));

        classifier.report_llc_status(LlcName::Thcs, status).unwrap();

        let telemetry = receiver.try_recv().unwrap();
        assert_eq!(telemetry.len(), 1);
        assert_eq!(telemetry["temperature"], json!([1.0, 2.0]));
        assert!(receiver_state.try_recv().is_err());
    }

    #[rstest]
    fn test_report_bridge_crane_is_skipped(mut classifier: StatusClassifier) {
        let status = to_status(json!({"status": {"messages": no_error()}}));

        assert!(classifier.report_llc_status(LlcName::Obc, status).is_ok());
    }
}
