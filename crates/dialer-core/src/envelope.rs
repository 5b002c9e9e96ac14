//! # Response Envelope
//!
//! The single output shape returned by every route: a flat string map with
//! a `status` key (`"success"` or `"error"`) and route-specific payload
//! keys such as `response`, `message`, `error`, `cdr`, `inner_number` or
//! `number_of_cdrs`.
//!
//! An envelope is built once per request and rendered as JSON.
//!
//! ## Result-key precedence
//!
//! Envelopes for AMI replies are derived by [`envelope_from_message`]. The
//! derived `status` depends only on whether the route's [`ResultKey`] is
//! present in the reply. The reply's own `Response` status line is ignored,
//! so `{"Response": "Success"}` without the result key yields an error
//! envelope, and `{"Response": "Error", "Message": "..."}` with the
//! `Message` result key yields a success envelope.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::message::{ProtocolMessage, ResultKey};

/// Envelope key carrying the outcome.
pub const STATUS: &str = "status";
/// Envelope key carrying the derived AMI response value.
pub const RESPONSE: &str = "response";
/// Envelope key carrying a semantic failure description.
pub const MESSAGE: &str = "message";
/// Envelope key carrying an error text.
pub const ERROR: &str = "error";

/// Outcome recorded under the `status` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvelopeStatus {
    /// The operation succeeded.
    Success,
    /// The operation failed.
    Error,
}

impl EnvelopeStatus {
    /// Return the wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for EnvelopeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform response mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseEnvelope(BTreeMap<String, String>);

impl ResponseEnvelope {
    /// Create an envelope with no keys.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// `{status: <status>}`.
    pub fn with_status(status: EnvelopeStatus) -> Self {
        Self::new().with(STATUS, status.as_str())
    }

    /// `{status: "success"}`.
    pub fn success() -> Self {
        Self::with_status(EnvelopeStatus::Success)
    }

    /// `{status: "error", error: <text>}` for a transport or collaborator failure.
    pub fn error(text: impl Into<String>) -> Self {
        Self::with_status(EnvelopeStatus::Error).with(ERROR, text)
    }

    /// `{status: "error", message: <text>}`: the collaborator answered, but
    /// not with what the operation expects.
    pub fn failure(text: impl Into<String>) -> Self {
        Self::with_status(EnvelopeStatus::Error).with(MESSAGE, text)
    }

    /// Add or replace a key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Parsed `status` key, if present and recognized.
    pub fn status(&self) -> Option<EnvelopeStatus> {
        match self.get(STATUS) {
            Some("success") => Some(EnvelopeStatus::Success),
            Some("error") => Some(EnvelopeStatus::Error),
            _ => None,
        }
    }

    /// Iterate over all key/value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// JSON rendering written to the response body.
    pub fn render(&self) -> String {
        // A map of strings always serializes.
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for ResponseEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResponseEnvelope {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Derive the envelope for an AMI reply.
///
/// - `key ∈ message` → `{status: "success", response: message[key]}`
/// - `key ∉ message` → `{status: "error", response: ""}`
///
/// The `Response` status line never participates.
pub fn envelope_from_message(message: &ProtocolMessage, key: ResultKey) -> ResponseEnvelope {
    match message.get(key.as_str()) {
        Some(value) => ResponseEnvelope::success().with(RESPONSE, value),
        None => ResponseEnvelope::with_status(EnvelopeStatus::Error).with(RESPONSE, ""),
    }
}
