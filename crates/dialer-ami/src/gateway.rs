//! The AMI gateway contract consumed by the dispatch layer.

use async_trait::async_trait;
use dialer_core::{CallCommand, CallInQueueCommand, ProtocolMessage, QueueCommand};

use crate::error::AmiError;

/// Telephony control operations.
///
/// Every method performs one logical request/response round trip and
/// returns the gateway's reply unchanged in meaning. Implementations own
/// their connection, its synchronization and its timeouts.
#[async_trait]
pub trait AmiGateway: Send + Sync {
    /// Add the agent's interface to the queue.
    async fn add_to_queue(&self, cmd: &QueueCommand) -> Result<ProtocolMessage, AmiError>;

    /// Remove the agent's interface from the queue.
    async fn remove_from_queue(&self, cmd: &QueueCommand) -> Result<ProtocolMessage, AmiError>;

    /// Membership state of the agent in the queue. When the agent is a
    /// member, the reply carries its device state under `StatusKey`.
    async fn queue_status(&self, cmd: &QueueCommand) -> Result<ProtocolMessage, AmiError>;

    /// Ring the agent, then dial the number.
    async fn originate_call(&self, cmd: &CallCommand) -> Result<ProtocolMessage, AmiError>;

    /// Dial the number and hand the answered call to the queue.
    async fn originate_in_queue(
        &self,
        cmd: &CallInQueueCommand,
    ) -> Result<ProtocolMessage, AmiError>;

    /// Ring the agent and attach a silent listener to `phone_number`'s channel.
    async fn spy(&self, cmd: &CallCommand) -> Result<ProtocolMessage, AmiError>;

    /// Raw listing of in-use peers under `CmdData`.
    async fn active_channels(&self) -> Result<ProtocolMessage, AmiError>;

    /// Liveness check; the reply carries `Ping: Pong`.
    async fn ping(&self) -> Result<ProtocolMessage, AmiError>;
}
