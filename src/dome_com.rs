//! Interface to the communication layer of the dome controller.

use crate::{
    enums::{LlcName, PowerManagementMode},
    error::MTDomeGuiResult,
};
use std::future::Future;
use tokio::time::Duration;

/// Raw status of a lower level component, as decoded from the controller.
pub type LlcStatus = serde_json::Map<String, serde_json::Value>;

/// Communication with the dome controller.
///
/// Implementations are shared between the model and its periodic tasks, so
/// every method takes `&self`.
pub trait DomeCom: Send + Sync + 'static {
    fn connect(&self) -> impl Future<Output = MTDomeGuiResult<()>> + Send;

    /// Safe to call when not connected.
    fn disconnect(&self) -> impl Future<Output = MTDomeGuiResult<()>> + Send;

    fn is_connected(&self) -> bool;

    fn power_management_mode(&self) -> PowerManagementMode;

    fn request_llc_status(
        &self,
        llc_name: LlcName,
    ) -> impl Future<Output = MTDomeGuiResult<LlcStatus>> + Send;

    /// Issue the commands that are waiting in the queue.
    fn process_command_queue(&self) -> impl Future<Output = MTDomeGuiResult<()>> + Send;

    /// Check that every issued command received a reply in time.
    fn check_all_commands_have_replies(
        &self,
    ) -> impl Future<Output = MTDomeGuiResult<()>> + Send;

    fn command_queue_period(&self) -> Duration;

    fn commands_replied_period(&self) -> Duration;

    /// Move the azimuth axis to `position` (deg) and then keep crawling at
    /// `velocity` (deg/sec).
    fn move_az(
        &self,
        position: f64,
        velocity: f64,
    ) -> impl Future<Output = MTDomeGuiResult<()>> + Send;

    /// Crawl the azimuth axis at `velocity` (deg/sec).
    fn crawl_az(&self, velocity: f64) -> impl Future<Output = MTDomeGuiResult<()>> + Send;

    fn stop_az(&self) -> impl Future<Output = MTDomeGuiResult<()>> + Send;

    fn park(&self) -> impl Future<Output = MTDomeGuiResult<()>> + Send;
}
