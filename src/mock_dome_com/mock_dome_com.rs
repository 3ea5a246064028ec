//! MTDome mock controller.
//!
//! `MockDomeCom` answers the requests of the model from an in-process
//! simulation: the statuses are shaped by the schema registry and the
//! azimuth axis follows the queued commands.

use crate::{
    config::DomeComConfig,
    constants::{
        APSCS_NUM_SHUTTERS, MAX_ACCELERATION, MAX_JERK, MAX_POSITION, MAX_VELOCITY,
    },
    dome_com::{DomeCom, LlcStatus},
    enums::{LlcName, MotionState, PowerManagementMode},
    error::{ErrorKind, MTDomeGuiError, MTDomeGuiResult},
    registry::SchemaRegistry,
    status::Telemetry,
};
use serde_json::{json, Value};
use std::{
    collections::{BTreeMap, VecDeque},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::{
    sync::{mpsc, oneshot},
    task,
    time::{self, Duration, Instant},
};

/// One simulation cycle.
const SIMULATION_CYCLE: Duration = Duration::from_millis(50);

/// Commands that move the azimuth axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueuedCommand {
    MoveAz { position: f64, velocity: f64 },
    CrawlAz { velocity: f64 },
    StopAz,
    Park,
}

#[derive(Debug)]
enum MockCmd {
    Connect,
    Disconnect,
    GetStatus(LlcName),
    Enqueue(QueuedCommand),
    ProcessCommandQueue,
    CheckReplies(Duration),
}

#[derive(Debug)]
enum MockReply {
    None,
    Status(LlcStatus),
}

type MockRequest = (MockCmd, oneshot::Sender<MTDomeGuiResult<MockReply>>);

/// Behavior of the simulated controller.
#[derive(Debug, Clone)]
pub struct MockOptions {
    /// Refuse every connection attempt.
    pub fail_connect: bool,
    /// Lower level component whose status request always fails.
    pub failing_llc: Option<LlcName>,
    /// Time the controller takes to accept a connection.
    pub connect_delay: Duration,
    /// Time the controller takes to reply to an issued command.
    pub reply_delay: Duration,
    pub power_management_mode: PowerManagementMode,
    pub command_queue_period: Duration,
    pub commands_replied_period: Duration,
}

impl Default for MockOptions {
    fn default() -> Self {
        MockOptions {
            fail_connect: false,
            failing_llc: None,
            connect_delay: Duration::ZERO,
            reply_delay: Duration::ZERO,
            power_management_mode: PowerManagementMode::NoPowerManagement,
            command_queue_period: Duration::from_secs(1),
            commands_replied_period: Duration::from_secs(600),
        }
    }
}

#[derive(Debug)]
pub struct MockDomeCom {
    cmd_channel: mpsc::Sender<MockRequest>,
    connected: Arc<AtomicBool>,
    config: DomeComConfig,
    options: MockOptions,
    simulation_task: task::JoinHandle<()>,
}

impl MockDomeCom {
    /// Start the simulation with the default options.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn start(
        registry: &SchemaRegistry,
        config: &DomeComConfig,
    ) -> MTDomeGuiResult<MockDomeCom> {
        MockDomeCom::start_with_options(registry, config, MockOptions::default())
    }

    pub fn start_with_options(
        registry: &SchemaRegistry,
        config: &DomeComConfig,
        options: MockOptions,
    ) -> MTDomeGuiResult<MockDomeCom> {
        let simulation = Simulation::new(registry, options.reply_delay)?;
        let connected = Arc::new(AtomicBool::new(false));
        let (cmd_channel, cmd_receiver) = mpsc::channel(100);

        let simulation_task = task::spawn(run_simulation(
            simulation,
            cmd_receiver,
            Arc::clone(&connected),
        ));

        Ok(MockDomeCom {
            cmd_channel,
            connected,
            config: config.clone(),
            options,
            simulation_task,
        })
    }

    /// Connection information the controller is reached with.
    pub fn get_config(&self) -> &DomeComConfig {
        &self.config
    }

    async fn request(&self, cmd: MockCmd) -> MTDomeGuiResult<MockReply> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.cmd_channel
            .send((cmd, reply_sender))
            .await
            .map_err(|_| {
                MTDomeGuiError::new(ErrorKind::Internal, "The simulation has stopped.")
            })?;
        reply_receiver.await.map_err(|_| {
            MTDomeGuiError::new(ErrorKind::Internal, "The simulation dropped the request.")
        })?
    }

    async fn enqueue(&self, command: QueuedCommand) -> MTDomeGuiResult<()> {
        self.request(MockCmd::Enqueue(command)).await.map(|_| ())
    }
}

impl Drop for MockDomeCom {
    fn drop(&mut self) {
        self.simulation_task.abort();
    }
}

impl DomeCom for MockDomeCom {
    async fn connect(&self) -> MTDomeGuiResult<()> {
        let address = format!("{}:{}", self.config.host, self.config.port);
        let connection_timeout = self.config.get_connection_timeout();
        log::info!("Connecting to the mock controller at {address}.");

        let connection = async {
            time::sleep(self.options.connect_delay).await;
            if self.options.fail_connect {
                return Err(MTDomeGuiError::from_error(
                    ErrorKind::ConnectionFailed,
                    &format!("The mock controller at {address} refused the connection."),
                    std::io::Error::new(
                        std::io::ErrorKind::ConnectionRefused,
                        "connection refused",
                    ),
                ));
            }
            self.request(MockCmd::Connect).await.map(|_| ())
        };

        time::timeout(connection_timeout, connection)
            .await
            .map_err(|error| {
                MTDomeGuiError::from_error(
                    ErrorKind::ConnectionFailed,
                    &format!("No connection to {address} within {connection_timeout:?}."),
                    error,
                )
            })?
    }

    async fn disconnect(&self) -> MTDomeGuiResult<()> {
        self.request(MockCmd::Disconnect).await.map(|_| ())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn power_management_mode(&self) -> PowerManagementMode {
        self.options.power_management_mode
    }

    async fn request_llc_status(&self, llc_name: LlcName) -> MTDomeGuiResult<LlcStatus> {
        if self.options.failing_llc == Some(llc_name) {
            return Err(MTDomeGuiError::new(
                ErrorKind::StatusRequestFailed,
                &format!("No reply to the status request of {llc_name}."),
            ));
        }

        match self.request(MockCmd::GetStatus(llc_name)).await? {
            MockReply::Status(status) => Ok(status),
            MockReply::None => Err(MTDomeGuiError::new(
                ErrorKind::Internal,
                &format!("Expected a status of {llc_name}."),
            )),
        }
    }

    async fn process_command_queue(&self) -> MTDomeGuiResult<()> {
        self.request(MockCmd::ProcessCommandQueue).await.map(|_| ())
    }

    async fn check_all_commands_have_replies(&self) -> MTDomeGuiResult<()> {
        self.request(MockCmd::CheckReplies(self.options.commands_replied_period))
            .await
            .map(|_| ())
    }

    fn command_queue_period(&self) -> Duration {
        self.options.command_queue_period
    }

    fn commands_replied_period(&self) -> Duration {
        self.options.commands_replied_period
    }

    async fn move_az(&self, position: f64, velocity: f64) -> MTDomeGuiResult<()> {
        if !(0.0..MAX_POSITION).contains(&position) || velocity.abs() > MAX_VELOCITY {
            return Err(MTDomeGuiError::invalid_input(&format!(
                "Cannot move to {position} deg at {velocity} deg/sec."
            )));
        }
        self.enqueue(QueuedCommand::MoveAz { position, velocity })
            .await
    }

    async fn crawl_az(&self, velocity: f64) -> MTDomeGuiResult<()> {
        if velocity.abs() > MAX_VELOCITY {
            return Err(MTDomeGuiError::invalid_input(&format!(
                "Cannot crawl at {velocity} deg/sec."
            )));
        }
        self.enqueue(QueuedCommand::CrawlAz { velocity }).await
    }

    async fn stop_az(&self) -> MTDomeGuiResult<()> {
        self.enqueue(QueuedCommand::StopAz).await
    }

    async fn park(&self) -> MTDomeGuiResult<()> {
        self.enqueue(QueuedCommand::Park).await
    }
}

async fn run_simulation(
    mut simulation: Simulation,
    mut cmd_receiver: mpsc::Receiver<MockRequest>,
    connected: Arc<AtomicBool>,
) {
    let mut cycle = time::interval(SIMULATION_CYCLE);

    loop {
        tokio::select! {
            request = cmd_receiver.recv() => {
                let Some((cmd, reply_sender)) = request else {
                    break;
                };
                log::debug!("Mock controller got {cmd:?}.");

                let reply = match cmd {
                    MockCmd::Connect => {
                        connected.store(true, Ordering::SeqCst);
                        Ok(MockReply::None)
                    }
                    MockCmd::Disconnect => {
                        connected.store(false, Ordering::SeqCst);
                        Ok(MockReply::None)
                    }
                    _ if !connected.load(Ordering::SeqCst) => Err(MTDomeGuiError::new(
                        ErrorKind::NotConnected,
                        "The mock controller is not connected.",
                    )),
                    MockCmd::GetStatus(llc_name) => {
                        simulation.get_status(llc_name).map(MockReply::Status)
                    }
                    MockCmd::Enqueue(command) => {
                        simulation.queue.push_back(command);
                        Ok(MockReply::None)
                    }
                    MockCmd::ProcessCommandQueue => {
                        simulation.process_command_queue();
                        Ok(MockReply::None)
                    }
                    MockCmd::CheckReplies(timeout) => {
                        let unanswered = simulation.check_all_commands_have_replies(timeout);
                        if !unanswered.is_empty() {
                            log::warn!(
                                "No reply to {unanswered:?} within {timeout:?}, giving up."
                            );
                        }
                        Ok(MockReply::None)
                    }
                };

                if reply_sender.send(reply).is_err() {
                    log::debug!("Requester of the mock controller went away.");
                }
            }
            _ = cycle.tick() => simulation.step(SIMULATION_CYCLE.as_secs_f64()),
        }
    }
}

#[derive(Debug)]
struct Simulation {
    templates: BTreeMap<LlcName, Telemetry>,
    queue: VecDeque<QueuedCommand>,
    /// Issued commands that have not been acknowledged yet.
    awaiting_reply: Vec<(QueuedCommand, Instant)>,
    reply_delay: Duration,
    az_position: f64,
    az_target: f64,
    az_crawl_velocity: f64,
    az_motion: MotionState,
    az_parking: bool,
}

impl Simulation {
    fn new(registry: &SchemaRegistry, reply_delay: Duration) -> MTDomeGuiResult<Simulation> {
        let mut templates = BTreeMap::new();
        for llc_name in LlcName::ALL {
            if registry.has_component(llc_name.name()) {
                templates.insert(
                    llc_name,
                    registry.generate_dict_from_registry(llc_name.name(), 0.0)?,
                );
            } else {
                log::debug!("{llc_name} is not in the registry and will not be simulated.");
            }
        }

        Ok(Simulation {
            templates,
            queue: VecDeque::new(),
            awaiting_reply: Vec::new(),
            reply_delay,
            az_position: 0.0,
            az_target: 0.0,
            az_crawl_velocity: 0.0,
            az_motion: MotionState::Stopped,
            az_parking: false,
        })
    }

    fn get_status(&self, llc_name: LlcName) -> MTDomeGuiResult<LlcStatus> {
        let mut status = self.templates.get(&llc_name).cloned().ok_or_else(|| {
            MTDomeGuiError::new(
                ErrorKind::StatusRequestFailed,
                &format!("{llc_name} has no status."),
            )
        })?;

        let motion: Value = match llc_name {
            LlcName::Amcs => json!(self.az_motion.name()),
            LlcName::Apscs => json!(vec![MotionState::Stopped.name(); APSCS_NUM_SHUTTERS]),
            _ => json!(MotionState::Stopped.name()),
        };
        status.insert(
            "status".to_owned(),
            json!({
                "messages": [{"code": 0, "description": "No Errors"}],
                "status": motion,
                "operationalMode": "NORMAL",
            }),
        );

        match llc_name {
            LlcName::Amcs => {
                status.insert(
                    "positionActual".to_owned(),
                    json!(self.az_position.to_radians()),
                );
                status.insert(
                    "positionCommanded".to_owned(),
                    json!(self.az_target.to_radians()),
                );
                status.insert("appliedConfiguration".to_owned(), applied_configuration());
            }
            LlcName::Lwscs => {
                status.insert("appliedConfiguration".to_owned(), applied_configuration());
            }
            LlcName::Cbcs => {
                status.insert("dcBusVoltage".to_owned(), json!(800.0));
            }
            _ => {}
        }

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs_f64())
            .unwrap_or_default();
        status.insert("timestamp".to_owned(), json!(timestamp));

        Ok(status)
    }

    fn process_command_queue(&mut self) {
        while let Some(command) = self.queue.pop_front() {
            log::debug!("Issue {command:?}.");
            match command {
                QueuedCommand::MoveAz { position, velocity } => {
                    self.az_target = position;
                    self.az_crawl_velocity = velocity;
                    self.az_parking = false;
                    self.az_motion = MotionState::Moving;
                }
                QueuedCommand::CrawlAz { velocity } => {
                    self.az_crawl_velocity = velocity;
                    self.az_parking = false;
                    self.az_motion = MotionState::Crawling;
                }
                QueuedCommand::StopAz => {
                    self.az_target = self.az_position;
                    self.az_crawl_velocity = 0.0;
                    self.az_parking = false;
                    self.az_motion = MotionState::Stopped;
                }
                QueuedCommand::Park => {
                    self.az_target = 0.0;
                    self.az_crawl_velocity = 0.0;
                    self.az_parking = true;
                    self.az_motion = MotionState::Parking;
                }
            }
            self.awaiting_reply.push((command, Instant::now()));
        }
    }

    /// Remove and return the commands that have waited `timeout` or more
    /// for a reply.
    fn check_all_commands_have_replies(&mut self, timeout: Duration) -> Vec<QueuedCommand> {
        let mut unanswered = Vec::new();
        self.awaiting_reply.retain(|(command, issued)| {
            if issued.elapsed() >= timeout {
                unanswered.push(*command);
                false
            } else {
                true
            }
        });
        unanswered
    }

    /// Advance the simulation by `dt` seconds.
    fn step(&mut self, dt: f64) {
        let reply_delay = self.reply_delay;
        self.awaiting_reply.retain(|(command, issued)| {
            if issued.elapsed() >= reply_delay {
                log::debug!("{command:?} acknowledged.");
                false
            } else {
                true
            }
        });

        match self.az_motion {
            MotionState::Moving | MotionState::Parking => {
                let delta_az = self.az_target - self.az_position;
                let delta_az_per_cycle = MAX_VELOCITY * dt;
                if delta_az.abs() > delta_az_per_cycle {
                    self.az_position += delta_az_per_cycle.copysign(delta_az);
                } else {
                    self.az_position = self.az_target;
                    self.az_motion = if self.az_parking {
                        MotionState::Parked
                    } else if self.az_crawl_velocity != 0.0 {
                        MotionState::Crawling
                    } else {
                        MotionState::Stopped
                    };
                }
            }
            MotionState::Crawling => {
                self.az_position =
                    (self.az_position + self.az_crawl_velocity * dt).rem_euclid(MAX_POSITION);
            }
            _ => {}
        }
    }
}

/// Applied motion limits, in radians as sent by the controller.
fn applied_configuration() -> Value {
    json!({
        "jmax": MAX_JERK.to_radians(),
        "amax": MAX_ACCELERATION.to_radians(),
        "vmax": MAX_VELOCITY.to_radians(),
    })
}
