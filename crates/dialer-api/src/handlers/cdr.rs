//! Call detail record lookup and removal.

use dialer_core::{CdrDeleteCommand, CdrLookupCommand, ResponseEnvelope};

use crate::error::DispatchError;
use crate::state::AppState;

/// Envelope key holding the rendered record.
pub const CDR: &str = "cdr";

/// Semantic failure text when a delete does not remove exactly one row.
pub const NOT_ONE_ROW: &str = "result is not 1";

/// `{cdr: <record>}` for the record with the given unique id.
pub async fn get_cdr(
    state: AppState,
    cmd: CdrLookupCommand,
) -> Result<ResponseEnvelope, DispatchError> {
    let record = state.cdr_store()?.get_cdr(&cmd.unique_id).await?;
    Ok(ResponseEnvelope::new().with(CDR, format!("{record:?}")))
}

/// Delete one record. Exactly one affected row is a success; any other
/// count is reported in-band as a semantic failure.
pub async fn delete_cdr(
    state: AppState,
    cmd: CdrDeleteCommand,
) -> Result<ResponseEnvelope, DispatchError> {
    let rows = state.cdr_store()?.delete_cdr(cmd.id).await?;
    if rows == 1 {
        Ok(ResponseEnvelope::success())
    } else {
        tracing::warn!(id = cmd.id, rows, "CDR delete did not affect exactly one row");
        Ok(ResponseEnvelope::failure(NOT_ONE_ROW))
    }
}
