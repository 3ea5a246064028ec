//! Typed publish points, grouped by topic.
//!
//! Each `Signal` is backed by a tokio broadcast channel. Emitting never
//! blocks: every subscriber has its own queue, and a subscriber that falls
//! more than `SIGNAL_CAPACITY` events behind skips the oldest ones.

use crate::{
    enums::{
        ControlMode, EnabledState, LlcName, MotionState, OperationalMode, PowerManagementMode,
        SubSystemId,
    },
    status::{CapacitorBank, MotionConfig, Telemetry},
};
use tokio::{
    sync::broadcast::{self, error::RecvError},
    task,
};

/// Number of events a subscriber may lag behind before skipping.
pub const SIGNAL_CAPACITY: usize = 64;

/// (motion_state, in_position) of a single axis.
pub type Motion = (MotionState, bool);

/// (motion_states, in_positions) of a subsystem with several moving parts.
pub type MotionList = (Vec<MotionState>, Vec<bool>);

#[derive(Debug, Clone)]
pub struct Signal<T> {
    sender: broadcast::Sender<T>,
}

impl<T: Clone + Send + 'static> Signal<T> {
    pub fn new() -> Signal<T> {
        let (sender, _) = broadcast::channel(SIGNAL_CAPACITY);
        Signal { sender }
    }

    /// Publish a value to all current subscribers.
    pub fn emit(&self, value: T) {
        // Only fails when nobody is subscribed.
        let _ = self.sender.send(value);
    }

    /// Receive every value emitted from now on, in emission order.
    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.sender.subscribe()
    }

    /// Run `callback` in a dedicated task for every value emitted from now on.
    ///
    /// The task ends when every copy of the signal is dropped.
    pub fn connect<F>(&self, mut callback: F) -> task::JoinHandle<()>
    where
        F: FnMut(T) + Send + 'static,
    {
        let mut receiver = self.subscribe();
        task::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(value) => callback(value),
                    Err(RecvError::Lagged(n_skipped)) => {
                        log::warn!("Subscriber lagged behind, skipped {n_skipped} events.");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

impl<T: Clone + Send + 'static> Default for Signal<T> {
    fn default() -> Self {
        Signal::new()
    }
}

/// Interlock signals.
#[derive(Debug, Clone, Default)]
pub struct SignalInterlock {
    /// Safety interlocks, true if latched.
    pub interlock: Signal<Vec<bool>>,
    /// Bitmask of the locking pins that have been engaged.
    pub locking_pins_engaged: Signal<i32>,
}

/// Discrete state signals.
#[derive(Debug, Clone, Default)]
pub struct SignalState {
    /// Bitmask of the brakes that are engaged.
    pub brake_engaged: Signal<i32>,
    pub azimuth_axis: Signal<EnabledState>,
    pub elevation_axis: Signal<EnabledState>,
    pub aperture_shutter: Signal<EnabledState>,
    pub louvers: Signal<EnabledState>,
    pub rear_access_door: Signal<EnabledState>,
    pub calibration_screen: Signal<EnabledState>,
    pub power_mode: Signal<PowerManagementMode>,
    pub control_mode: Signal<ControlMode>,
}

#[derive(Debug, Clone, Default)]
pub struct SignalOperationalMode {
    pub subsystem_mode: Signal<(SubSystemId, OperationalMode)>,
}

/// Lower level components that publish their telemetry as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TelemetryTopic {
    Amcs,
    Apscs,
    Cscs,
    Lcs,
    Lwscs,
    Rad,
    Thcs,
}

impl TelemetryTopic {
    pub const ALL: [TelemetryTopic; 7] = [
        TelemetryTopic::Amcs,
        TelemetryTopic::Apscs,
        TelemetryTopic::Cscs,
        TelemetryTopic::Lcs,
        TelemetryTopic::Lwscs,
        TelemetryTopic::Rad,
        TelemetryTopic::Thcs,
    ];

    /// The monitoring system, the capacitor banks and the bridge crane have
    /// no plain telemetry topic.
    pub fn from_llc_name(llc_name: LlcName) -> Option<TelemetryTopic> {
        match llc_name {
            LlcName::Amcs => Some(TelemetryTopic::Amcs),
            LlcName::Apscs => Some(TelemetryTopic::Apscs),
            LlcName::Cscs => Some(TelemetryTopic::Cscs),
            LlcName::Lcs => Some(TelemetryTopic::Lcs),
            LlcName::Lwscs => Some(TelemetryTopic::Lwscs),
            LlcName::Rad => Some(TelemetryTopic::Rad),
            LlcName::Thcs => Some(TelemetryTopic::Thcs),
            LlcName::Cbcs | LlcName::Moncs | LlcName::Obc => None,
        }
    }

    pub fn llc_name(&self) -> LlcName {
        match self {
            TelemetryTopic::Amcs => LlcName::Amcs,
            TelemetryTopic::Apscs => LlcName::Apscs,
            TelemetryTopic::Cscs => LlcName::Cscs,
            TelemetryTopic::Lcs => LlcName::Lcs,
            TelemetryTopic::Lwscs => LlcName::Lwscs,
            TelemetryTopic::Rad => LlcName::Rad,
            TelemetryTopic::Thcs => LlcName::Thcs,
        }
    }
}

/// Telemetry signals, one per lower level component.
#[derive(Debug, Clone, Default)]
pub struct SignalTelemetry {
    pub amcs: Signal<Telemetry>,
    pub apscs: Signal<Telemetry>,
    /// Capacitor bank flags, published on change.
    pub cbcs: Signal<CapacitorBank>,
    /// DC bus voltage of the capacitor bank in Volt.
    pub cbcs_voltage: Signal<f64>,
    pub cscs: Signal<Telemetry>,
    pub lcs: Signal<Telemetry>,
    pub lwscs: Signal<Telemetry>,
    pub rad: Signal<Telemetry>,
    pub thcs: Signal<Telemetry>,
}

impl SignalTelemetry {
    pub fn topic(&self, topic: TelemetryTopic) -> &Signal<Telemetry> {
        match topic {
            TelemetryTopic::Amcs => &self.amcs,
            TelemetryTopic::Apscs => &self.apscs,
            TelemetryTopic::Cscs => &self.cscs,
            TelemetryTopic::Lcs => &self.lcs,
            TelemetryTopic::Lwscs => &self.lwscs,
            TelemetryTopic::Rad => &self.rad,
            TelemetryTopic::Thcs => &self.thcs,
        }
    }
}

/// Target signals as (position, velocity) in deg and deg/sec.
#[derive(Debug, Clone, Default)]
pub struct SignalTarget {
    pub position_velocity_azimuth: Signal<(f64, f64)>,
    pub position_velocity_elevation: Signal<(f64, f64)>,
}

#[derive(Debug, Clone, Default)]
pub struct SignalMotion {
    pub azimuth_axis: Signal<Motion>,
    pub elevation_axis: Signal<Motion>,
    pub aperture_shutter: Signal<MotionList>,
    pub louvers: Signal<MotionList>,
    pub rear_access_door: Signal<MotionList>,
    pub calibration_screen: Signal<Motion>,
}

/// Fault code signals. An empty string means no fault.
#[derive(Debug, Clone, Default)]
pub struct SignalFaultCode {
    pub azimuth_axis: Signal<String>,
    pub elevation_axis: Signal<String>,
    pub aperture_shutter: Signal<String>,
    pub louvers: Signal<String>,
    pub rear_access_door: Signal<String>,
    pub calibration_screen: Signal<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SignalConfig {
    pub amcs: Signal<MotionConfig>,
    pub lwscs: Signal<MotionConfig>,
}

/// All the signal groups of one reporter.
#[derive(Debug, Clone, Default)]
pub struct Signals {
    pub interlock: SignalInterlock,
    pub state: SignalState,
    pub operational_mode: SignalOperationalMode,
    pub telemetry: SignalTelemetry,
    pub target: SignalTarget,
    pub motion: SignalMotion,
    pub fault_code: SignalFaultCode,
    pub config: SignalConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::time::{timeout, Duration};

    #[test]
    fn test_emit_without_subscriber() {
        let signal: Signal<i32> = Signal::new();

        signal.emit(1);
        let mut receiver = signal.subscribe();
        signal.emit(2);

        assert_eq!(receiver.try_recv().unwrap(), 2);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_subscribers_receive_in_order() {
        let signal: Signal<i32> = Signal::new();
        let mut first = signal.subscribe();
        let mut second = signal.subscribe();

        for value in 0..3 {
            signal.emit(value);
        }

        for value in 0..3 {
            assert_eq!(first.try_recv().unwrap(), value);
            assert_eq!(second.try_recv().unwrap(), value);
        }
        assert!(first.try_recv().is_err());
    }

    #[test]
    fn test_late_subscriber_misses_earlier_events() {
        let signal: Signal<i32> = Signal::new();
        let _early = signal.subscribe();

        signal.emit(1);
        let mut late = signal.subscribe();

        assert!(late.try_recv().is_err());
    }

    #[test]
    fn test_clone_shares_channel() {
        let signal: Signal<String> = Signal::new();
        let mut receiver = signal.subscribe();

        signal.clone().emit("fault".to_owned());

        assert_eq!(receiver.try_recv().unwrap(), "fault");
    }

    #[tokio::test]
    async fn test_connect_runs_callback() {
        let signal: Signal<i32> = Signal::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        let received_in_callback = Arc::clone(&received);
        let (done_sender, mut done_receiver) = tokio::sync::mpsc::channel(1);

        let _task = signal.connect(move |value| {
            received_in_callback.lock().unwrap().push(value);
            if value == 2 {
                let _ = done_sender.try_send(());
            }
        });

        signal.emit(1);
        signal.emit(2);

        timeout(Duration::from_secs(1), done_receiver.recv())
            .await
            .unwrap();
        assert_eq!(*received.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_telemetry_topic_from_llc_name() {
        for topic in TelemetryTopic::ALL {
            assert_eq!(TelemetryTopic::from_llc_name(topic.llc_name()), Some(topic));
        }

        assert_eq!(TelemetryTopic::from_llc_name(LlcName::Moncs), None);
        assert_eq!(TelemetryTopic::from_llc_name(LlcName::Cbcs), None);
        assert_eq!(TelemetryTopic::from_llc_name(LlcName::Obc), None);
    }
}
