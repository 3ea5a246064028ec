//! Provide the model of the application: the connection to the dome
//! controller and the periodic polling of its status.

use crate::{
    config::ModelConfig,
    constants::status_period,
    dome_com::{DomeCom, LlcStatus},
    enums::{EnabledState, LlcName, PowerManagementMode},
    error::{ErrorKind, MTDomeGuiError, MTDomeGuiResult},
    registry::SchemaRegistry,
    reporter::Reporter,
    signals::Signals,
    status::Status,
    status_classifier::StatusClassifier,
};
use std::{future::Future, sync::Arc};
use tokio::{
    sync::{mpsc, oneshot},
    task,
    time::{sleep, Duration},
};

/// Capacity of the request channel of the reporter task.
const REPORTER_CHANNEL_SIZE: usize = 100;

#[derive(Debug)]
enum ReporterRequest {
    ReportDefault,
    ReportConnected {
        power_mode: PowerManagementMode,
    },
    LlcStatus {
        llc_name: LlcName,
        status: LlcStatus,
        reply: oneshot::Sender<MTDomeGuiResult<()>>,
    },
    GetStatus(oneshot::Sender<Status>),
}

#[derive(Debug)]
pub struct Model<C: DomeCom> {
    config: ModelConfig,
    dome_com: Arc<C>,
    signals: Signals,
    reporter_channel: mpsc::Sender<ReporterRequest>,
    reporter_task: task::JoinHandle<()>,
    periodic_tasks: Vec<(String, task::JoinHandle<()>)>,
}

impl<C: DomeCom> Model<C> {
    /// Create the model and start its reporter task.
    ///
    /// Nothing is polled until `connect` succeeds.
    pub async fn create_and_start(
        config: ModelConfig,
        dome_com: C,
        registry: &SchemaRegistry,
    ) -> MTDomeGuiResult<Model<C>> {
        let reporter = Reporter::new(registry)?;
        let signals = reporter.get_signals().clone();

        let (reporter_channel, reporter_receiver) = mpsc::channel(REPORTER_CHANNEL_SIZE);
        let reporter_task = task::spawn(run_reporter(
            StatusClassifier::new(reporter),
            reporter_receiver,
        ));

        Ok(Model {
            config,
            dome_com: Arc::new(dome_com),
            signals,
            reporter_channel,
            reporter_task,
            periodic_tasks: Vec::new(),
        })
    }

    /// Signals the panels subscribe to.
    pub fn get_signals(&self) -> &Signals {
        &self.signals
    }

    /// Collaborator, for the command panels.
    pub fn get_dome_com(&self) -> &C {
        &self.dome_com
    }

    /// Connect to the controller and start polling.
    pub async fn connect(&mut self) -> MTDomeGuiResult<()> {
        if let Err(error) = self.dome_com.connect().await {
            return Err(MTDomeGuiError::from_error(
                ErrorKind::ConnectionFailed,
                &format!("Connection to the controller failed: {error}."),
                error,
            ));
        }

        self.send_to_reporter(ReporterRequest::ReportConnected {
            power_mode: self.dome_com.power_management_mode(),
        })
        .await?;

        self.start_periodic_tasks().await;

        log::info!("connected");
        Ok(())
    }

    /// Stop polling and disconnect from the controller.
    ///
    /// Safe to call when not connected.
    pub async fn disconnect(&mut self) -> MTDomeGuiResult<()> {
        log::info!("disconnect.");

        self.cancel_periodic_tasks().await;

        if self.is_connected() {
            self.dome_com.disconnect().await?;
        }
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.dome_com.is_connected()
    }

    pub fn assert_is_connected(&self) -> MTDomeGuiResult<()> {
        if !self.is_connected() {
            return Err(MTDomeGuiError::new(
                ErrorKind::NotConnected,
                "The connection is not established.",
            ));
        }
        Ok(())
    }

    /// Publish the default baseline on every signal.
    pub async fn report_default(&self) -> MTDomeGuiResult<()> {
        self.send_to_reporter(ReporterRequest::ReportDefault).await
    }

    /// Snapshot of the status, after every request already sent to the
    /// reporter has been handled.
    pub async fn get_status(&self) -> MTDomeGuiResult<Status> {
        let (reply, reply_receiver) = oneshot::channel();
        self.send_to_reporter(ReporterRequest::GetStatus(reply))
            .await?;
        reply_receiver.await.map_err(|_| reporter_stopped())
    }

    /// Names of the periodic tasks that have stopped on their own.
    pub fn stopped_periodic_tasks(&self) -> Vec<String> {
        self.periodic_tasks
            .iter()
            .filter(|(_, periodic_task)| periodic_task.is_finished())
            .map(|(name, _)| name.clone())
            .collect()
    }

    async fn send_to_reporter(&self, request: ReporterRequest) -> MTDomeGuiResult<()> {
        self.reporter_channel
            .send(request)
            .await
            .map_err(|_| reporter_stopped())
    }

    async fn start_periodic_tasks(&mut self) {
        self.cancel_periodic_tasks().await;

        for llc_name in self.config.polled_subsystems.clone() {
            let Some(interval) = status_period(llc_name) else {
                log::warn!("{llc_name} has no status to poll.");
                continue;
            };

            let dome_com = Arc::clone(&self.dome_com);
            let reporter_channel = self.reporter_channel.clone();
            self.spawn_periodic_task(
                format!("request_llc_status_and_report({llc_name})"),
                interval,
                move || {
                    request_llc_status_and_report(
                        Arc::clone(&dome_com),
                        reporter_channel.clone(),
                        llc_name,
                    )
                },
            );
        }

        let dome_com = Arc::clone(&self.dome_com);
        self.spawn_periodic_task(
            String::from("check_all_commands_have_replies"),
            self.dome_com.commands_replied_period(),
            move || {
                let dome_com = Arc::clone(&dome_com);
                async move { dome_com.check_all_commands_have_replies().await }
            },
        );

        let dome_com = Arc::clone(&self.dome_com);
        self.spawn_periodic_task(
            String::from("process_command_queue"),
            self.dome_com.command_queue_period(),
            move || {
                let dome_com = Arc::clone(&dome_com);
                async move { dome_com.process_command_queue().await }
            },
        );
    }

    fn spawn_periodic_task<F, Fut>(&mut self, name: String, interval: Duration, method: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = MTDomeGuiResult<()>> + Send + 'static,
    {
        let periodic_task = task::spawn(one_periodic_task(name.clone(), interval, method));
        self.periodic_tasks.push((name, periodic_task));
    }

    async fn cancel_periodic_tasks(&mut self) {
        while let Some((name, periodic_task)) = self.periodic_tasks.pop() {
            periodic_task.abort();
            if let Err(error) = periodic_task.await {
                if error.is_panic() {
                    log::error!("Periodic task {name} panicked: {error}");
                }
            }
        }
    }
}

impl<C: DomeCom> Drop for Model<C> {
    fn drop(&mut self) {
        for (_, periodic_task) in &self.periodic_tasks {
            periodic_task.abort();
        }
        self.reporter_task.abort();
    }
}

fn reporter_stopped() -> MTDomeGuiError {
    MTDomeGuiError::new(ErrorKind::Internal, "The reporter task has stopped.")
}

/// Run `method` every `interval` until it fails or the task is aborted.
async fn one_periodic_task<F, Fut>(name: String, interval: Duration, mut method: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = MTDomeGuiResult<()>>,
{
    log::debug!("Starting periodic task {name} with interval {interval:?}.");

    loop {
        if let Err(error) = method().await {
            log::error!("Periodic task {name} has stopped: {error}");
            return;
        }
        sleep(interval).await;
    }
}

/// Request the status of a lower level component and hand it to the
/// reporter. A failed request only skips this cycle.
async fn request_llc_status_and_report<C: DomeCom>(
    dome_com: Arc<C>,
    reporter_channel: mpsc::Sender<ReporterRequest>,
    llc_name: LlcName,
) -> MTDomeGuiResult<()> {
    let status = match dome_com.request_llc_status(llc_name).await {
        Ok(status) => status,
        Err(error) => {
            log::error!("Failed to retrieve the status of {llc_name}: {error}");
            return Ok(());
        }
    };

    let (reply, reply_receiver) = oneshot::channel();
    reporter_channel
        .send(ReporterRequest::LlcStatus {
            llc_name,
            status,
            reply,
        })
        .await
        .map_err(|_| reporter_stopped())?;

    reply_receiver.await.map_err(|_| reporter_stopped())?
}

async fn run_reporter(
    mut classifier: StatusClassifier,
    mut reporter_receiver: mpsc::Receiver<ReporterRequest>,
) {
    while let Some(request) = reporter_receiver.recv().await {
        match request {
            ReporterRequest::ReportDefault => classifier.get_reporter_mut().report_default(),
            ReporterRequest::ReportConnected { power_mode } => {
                report_connected(classifier.get_reporter_mut(), power_mode)
            }
            ReporterRequest::LlcStatus {
                llc_name,
                status,
                reply,
            } => {
                let result = classifier.report_llc_status(llc_name, status);
                if reply.send(result).is_err() {
                    log::debug!("Poller of {llc_name} went away before the reply.");
                }
            }
            ReporterRequest::GetStatus(reply) => {
                if reply.send(classifier.get_reporter().get_status().clone()).is_err() {
                    log::debug!("Status requester went away before the reply.");
                }
            }
        }
    }
    log::debug!("Reporter task stopped.");
}

fn report_connected(reporter: &mut Reporter, power_mode: PowerManagementMode) {
    reporter.report_state_azimuth_axis(EnabledState::Enabled);
    reporter.report_fault_code_azimuth_axis("");

    reporter.report_state_elevation_axis(EnabledState::Enabled);
    reporter.report_fault_code_elevation_axis("");

    reporter.report_state_aperture_shutter(EnabledState::Enabled);
    reporter.report_fault_code_aperture_shutter("");

    reporter.report_state_brake_engaged(0);
    reporter.report_state_locking_pins_engaged(0);

    reporter.report_state_power_mode(power_mode);
}
