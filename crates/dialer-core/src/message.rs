//! # AMI Protocol Messages
//!
//! A [`ProtocolMessage`] is the open-ended key/value reply produced by the
//! AMI gateway. There is no fixed schema; the keys a route cares about are
//! named by its [`ResultKey`].
//!
//! ## Keys by operation
//!
//! | Operation            | Result key  | Other keys commonly present        |
//! |----------------------|-------------|------------------------------------|
//! | queue add / status   | `StatusKey` | `Response`, `Message`, `Paused`    |
//! | queue remove         | `Message`   | `Response`                         |
//! | place call / spy     | `Message`   | `Response`                         |
//! | call in queue        | `Message`   | `Response`                         |
//! | active channels      | `CmdData`   | `Response`                         |
//! | ping                 | `Ping`      | `Response`, `Timestamp`            |
//!
//! `Response` is the status line. It is informational only; see
//! [`crate::envelope::envelope_from_message`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Status-line key.
pub const RESPONSE: &str = "Response";
/// Correlation key attached to every action and its reply.
pub const ACTION_ID: &str = "ActionID";
/// Discriminator of unsolicited and list events.
pub const EVENT: &str = "Event";
/// Status-line value announcing that raw command output follows.
pub const FOLLOWS: &str = "Follows";

/// Open-ended AMI reply.
///
/// Keys are kept sorted so that rendering in logs is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolMessage(BTreeMap<String, String>);

impl ProtocolMessage {
    /// Create an empty message.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether the key is present (with any value, including empty).
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert a value, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Insert a value, joining it to an existing one with `\n`.
    ///
    /// AMI repeats keys such as `Output` once per line of output.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        self.0
            .entry(key.into())
            .and_modify(|existing| {
                existing.push('\n');
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// The `Response` status line, if present.
    pub fn status_line(&self) -> Option<&str> {
        self.get(RESPONSE)
    }

    /// Whether the status line announces raw output (`Response: Follows`).
    pub fn is_follows(&self) -> bool {
        self.status_line() == Some(FOLLOWS)
    }

    /// The `Event` discriminator, if this message is an event.
    pub fn event(&self) -> Option<&str> {
        self.get(EVENT)
    }

    /// The `ActionID` correlation value, if present.
    pub fn action_id(&self) -> Option<&str> {
        self.get(ACTION_ID)
    }

    /// Iterate over all key/value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the message has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ProtocolMessage {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for ProtocolMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Name of the [`ProtocolMessage`] field that becomes an envelope's
/// `response` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultKey(&'static str);

impl ResultKey {
    /// Queue member status, synthesized by the queue status operation.
    pub const STATUS_KEY: Self = Self("StatusKey");
    /// Free-text message of an action reply.
    pub const MESSAGE: Self = Self("Message");
    /// Raw output of a CLI command.
    pub const CMD_DATA: Self = Self("CmdData");
    /// Ping reply.
    pub const PING: Self = Self("Ping");

    /// Use an arbitrary key.
    pub const fn new(key: &'static str) -> Self {
        Self(key)
    }

    /// The key as a string.
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ResultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
