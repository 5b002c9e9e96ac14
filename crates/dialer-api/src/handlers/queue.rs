//! Queue membership.

use std::sync::Arc;

use dialer_ami::AmiGateway;
use dialer_core::{QueueCommand, ResultKey};

use crate::dispatch::ami::AmiReply;
use crate::error::DispatchError;

/// Add the agent to the queue, then report its member status.
///
/// The status query only runs once the add has returned a reply; a failed
/// add aborts the whole operation.
pub async fn queue_add(
    ami: Arc<dyn AmiGateway>,
    cmd: QueueCommand,
) -> Result<AmiReply, DispatchError> {
    ami.add_to_queue(&cmd).await?;
    let status = ami.queue_status(&cmd).await?;
    Ok(AmiReply::new(status, ResultKey::STATUS_KEY))
}

pub async fn queue_remove(
    ami: Arc<dyn AmiGateway>,
    cmd: QueueCommand,
) -> Result<AmiReply, DispatchError> {
    let reply = ami.remove_from_queue(&cmd).await?;
    Ok(AmiReply::new(reply, ResultKey::MESSAGE))
}

pub async fn queue_status(
    ami: Arc<dyn AmiGateway>,
    cmd: QueueCommand,
) -> Result<AmiReply, DispatchError> {
    let reply = ami.queue_status(&cmd).await?;
    Ok(AmiReply::new(reply, ResultKey::STATUS_KEY))
}
