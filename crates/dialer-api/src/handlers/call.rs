//! Call control and gateway inspection.

use std::sync::Arc;

use dialer_ami::AmiGateway;
use dialer_core::{CallCommand, CallInQueueCommand, ResultKey};

use crate::dispatch::ami::AmiReply;
use crate::error::DispatchError;

/// Ring the agent, then dial the customer.
pub async fn place_call(
    ami: Arc<dyn AmiGateway>,
    cmd: CallCommand,
) -> Result<AmiReply, DispatchError> {
    let reply = ami.originate_call(&cmd).await?;
    Ok(AmiReply::new(reply, ResultKey::MESSAGE))
}

/// Dial the customer and hand the answered call to a queue.
pub async fn place_call_in_queue(
    ami: Arc<dyn AmiGateway>,
    cmd: CallInQueueCommand,
) -> Result<AmiReply, DispatchError> {
    let reply = ami.originate_in_queue(&cmd).await?;
    Ok(AmiReply::new(reply, ResultKey::MESSAGE))
}

/// Let the agent listen in on another extension.
pub async fn place_spy(
    ami: Arc<dyn AmiGateway>,
    cmd: CallCommand,
) -> Result<AmiReply, DispatchError> {
    let reply = ami.spy(&cmd).await?;
    Ok(AmiReply::new(reply, ResultKey::MESSAGE))
}

pub async fn show_inuse(ami: Arc<dyn AmiGateway>) -> Result<AmiReply, DispatchError> {
    let reply = ami.active_channels().await?;
    Ok(AmiReply::new(reply, ResultKey::CMD_DATA))
}

pub async fn ping_gateway(ami: Arc<dyn AmiGateway>) -> Result<AmiReply, DispatchError> {
    let reply = ami.ping().await?;
    Ok(AmiReply::new(reply, ResultKey::PING))
}
