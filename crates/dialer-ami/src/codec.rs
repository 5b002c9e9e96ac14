//! # AMI Wire Codec
//!
//! Frames are `Key: Value` lines terminated by CRLF; a blank line ends the
//! frame. Two shapes need special care when reading:
//!
//! - Repeated keys (`Output:` once per line) are joined with `\n`.
//! - Legacy `Response: Follows` replies carry raw text after their headers,
//!   terminated by `--END COMMAND--`. The text is stored under `CmdData`.

use std::fmt;

use dialer_core::message::{ACTION_ID, FOLLOWS, RESPONSE};
use dialer_core::{ProtocolMessage, ResultKey};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::AmiError;

/// Terminator of legacy command output.
pub const END_COMMAND: &str = "--END COMMAND--";

/// Headers whose values are never printed.
const REDACTED_HEADERS: &[&str] = &["Secret"];

/// An action to send to the gateway.
#[derive(Clone, PartialEq, Eq)]
pub struct Action {
    name: String,
    headers: Vec<(String, String)>,
}

impl Action {
    /// Start an action of the given type (`Ping`, `QueueAdd`, ...).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            headers: Vec::new(),
        }
    }

    /// Append a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Action type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header value by key (first occurrence).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Render the frame for the wire, tagged with `action_id`.
    ///
    /// CR and LF are stripped from values so request parameters cannot
    /// inject extra headers.
    pub fn encode(&self, action_id: &str) -> String {
        let mut out = String::with_capacity(64 + self.headers.len() * 32);
        push_line(&mut out, "Action", &self.name);
        push_line(&mut out, ACTION_ID, action_id);
        for (key, value) in &self.headers {
            push_line(&mut out, key, value);
        }
        out.push_str("\r\n");
        out
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        map.entry(&"Action", &self.name);
        for (key, value) in &self.headers {
            if REDACTED_HEADERS.contains(&key.as_str()) {
                map.entry(key, &"[REDACTED]");
            } else {
                map.entry(key, value);
            }
        }
        map.finish()
    }
}

fn push_line(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push_str(": ");
    out.extend(value.chars().filter(|c| *c != '\r' && *c != '\n'));
    out.push_str("\r\n");
}

/// Write one action frame and flush.
pub async fn write_action<W>(writer: &mut W, action: &Action, action_id: &str) -> Result<(), AmiError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(action.encode(action_id).as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Read the greeting line (`Asterisk Call Manager/x.y`).
pub async fn read_banner<R>(reader: &mut R) -> Result<String, AmiError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Err(AmiError::ConnectionClosed);
    }
    let banner = line.trim_end().to_string();
    if !banner.contains("Call Manager") {
        return Err(AmiError::Protocol(format!("unexpected banner: {banner}")));
    }
    Ok(banner)
}

/// Read one frame.
pub async fn read_message<R>(reader: &mut R) -> Result<ProtocolMessage, AmiError>
where
    R: AsyncBufRead + Unpin,
{
    let mut message = ProtocolMessage::new();
    let mut output: Option<Vec<String>> = None;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Err(AmiError::ConnectionClosed);
        }
        let text = line.trim_end_matches(['\r', '\n']);

        if let Some(lines) = output.as_mut() {
            if let Some(rest) = text.strip_suffix(END_COMMAND) {
                if !rest.is_empty() {
                    lines.push(rest.to_string());
                }
                message.insert(ResultKey::CMD_DATA.as_str(), lines.join("\n"));
                output = None;
            } else {
                lines.push(text.to_string());
            }
            continue;
        }

        let in_follows_body =
            message.status_line() == Some(FOLLOWS) && !message.contains_key(ResultKey::CMD_DATA.as_str());
        if in_follows_body && !is_follows_header(text) {
            match text.strip_suffix(END_COMMAND) {
                Some(rest) => {
                    message.insert(ResultKey::CMD_DATA.as_str(), rest);
                }
                None => output = Some(vec![text.to_string()]),
            }
            continue;
        }

        if text.is_empty() {
            if message.is_empty() {
                continue;
            }
            return Ok(message);
        }

        match split_header(text) {
            Some((key, value)) => message.append(key, value),
            None => tracing::debug!(line = text, "ignoring non-header AMI line"),
        }
    }
}

fn split_header(text: &str) -> Option<(&str, &str)> {
    let (key, value) = text.split_once(':')?;
    let key = key.trim();
    if key.is_empty() || key.contains(' ') {
        return None;
    }
    Some((key, value.trim_start()))
}

fn is_follows_header(text: &str) -> bool {
    matches!(split_header(text), Some((key, _)) if key == "Privilege" || key == ACTION_ID || key == RESPONSE)
}
