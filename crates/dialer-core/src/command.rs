//! # Commands
//!
//! One struct per operation. Fields are bound from request parameters by
//! their snake_case name; `Option` fields are optional, everything else is
//! required and binding fails when it is missing or does not convert.
//!
//! Commands are created per request and dropped once the handler returns.

use serde::{Deserialize, Serialize};

/// Queue membership operation (add, remove, status).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCommand {
    /// Queue name as configured on the PBX.
    pub queue: String,
    /// Agent extension.
    pub inner_number: String,
}

/// Outbound call, or a spy session when used by `place-spy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallCommand {
    /// Extension that is rung first.
    pub inner_number: String,
    /// Destination number. For spy sessions, the extension listened to.
    pub phone_number: String,
    /// Tenant the call is placed for.
    #[serde(default)]
    pub country: Option<String>,
}

/// Outbound call whose answered leg is dropped into a queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallInQueueCommand {
    /// Number dialled out.
    pub phone_number: String,
    /// Queue that receives the answered call.
    pub queue: String,
    /// Tenant the call is placed for.
    #[serde(default)]
    pub country: Option<String>,
}

/// Partner-portal relay parameters.
///
/// `country` selects the tenant; the remaining fields are required only by
/// the operations that use them, which check for them explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneCallCommand {
    /// Tenant key into the agency table.
    pub country: String,
    /// Caller's number.
    #[serde(default)]
    pub calling_phone: Option<String>,
    /// Agent extension.
    #[serde(default)]
    pub inner_number: Option<String>,
    /// Link shown in the review popup.
    #[serde(default)]
    pub review_href: Option<String>,
    /// Portal-side company id.
    #[serde(default)]
    pub id: Option<String>,
}

/// CDR lookup by the PBX unique call id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdrLookupCommand {
    /// PBX `uniqueid` of the call.
    pub unique_id: String,
}

/// CDR deletion by row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdrDeleteCommand {
    /// Primary key of the record.
    pub id: i64,
}
