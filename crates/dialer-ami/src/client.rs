//! # AMI TCP Client
//!
//! One connection, opened lazily and reopened after any transport failure.
//! Actions are serialized through an async mutex so that a reply can be
//! matched to its action without a demultiplexing task; messages carrying
//! another `ActionID` (or none) are skipped.
//!
//! Each round trip, including a reconnect it triggers, is bounded by
//! [`AmiSettings::timeout_secs`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dialer_core::message::RESPONSE;
use dialer_core::{
    AmiSettings, CallCommand, CallInQueueCommand, ProtocolMessage, QueueCommand, ResultKey,
};
use tokio::io::BufReader;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::codec::{read_banner, read_message, write_action, Action};
use crate::error::AmiError;
use crate::gateway::AmiGateway;

/// Event closing a `QueueStatus` listing.
const QUEUE_STATUS_COMPLETE: &str = "QueueStatusComplete";
/// Event describing one queue member.
const QUEUE_MEMBER: &str = "QueueMember";
/// CLI command listing in-use SIP peers.
const SHOW_INUSE: &str = "sip show inuse";

struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

/// A reply plus the list events that followed it.
struct Exchange {
    reply: ProtocolMessage,
    events: Vec<ProtocolMessage>,
}

/// Production [`AmiGateway`].
pub struct AmiClient {
    settings: AmiSettings,
    conn: Mutex<Option<Connection>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for AmiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmiClient")
            .field("host", &self.settings.host)
            .field("port", &self.settings.port)
            .field("username", &self.settings.username)
            .finish_non_exhaustive()
    }
}

impl AmiClient {
    /// Create a client. No connection is made until the first action.
    pub fn new(settings: AmiSettings) -> Self {
        Self {
            settings,
            conn: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a client and log in immediately, failing fast on bad settings.
    pub async fn connect(settings: AmiSettings) -> Result<Self, AmiError> {
        let client = Self::new(settings);
        let timeout = client.timeout();
        let conn = tokio::time::timeout(timeout, open(&client.settings))
            .await
            .map_err(|_| AmiError::Timeout(client.settings.timeout_secs))??;
        *client.conn.lock().await = Some(conn);
        Ok(client)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeout_secs)
    }

    fn interface(&self, extension: &str) -> String {
        format!("{}/{}", self.settings.channel_tech, extension)
    }

    /// Send one action and return its reply.
    pub async fn send(&self, action: Action) -> Result<ProtocolMessage, AmiError> {
        self.exchange(action, None).await.map(|x| x.reply)
    }

    async fn exchange(
        &self,
        action: Action,
        collect_until: Option<&str>,
    ) -> Result<Exchange, AmiError> {
        let action_id = format!("dialer-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(action = ?action, action_id = %action_id, ">>> AMI");

        let mut slot = self.conn.lock().await;
        let outcome = tokio::time::timeout(
            self.timeout(),
            round_trip(&mut slot, &self.settings, &action, &action_id, collect_until),
        )
        .await;

        match outcome {
            Ok(Ok(exchange)) => Ok(exchange),
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "AMI exchange failed, dropping connection");
                *slot = None;
                Err(err)
            }
            Err(_) => {
                tracing::warn!(action = action.name(), "AMI exchange timed out, dropping connection");
                *slot = None;
                Err(AmiError::Timeout(self.settings.timeout_secs))
            }
        }
    }

    fn originate(&self, channel: String) -> Action {
        Action::new("Originate")
            .header("Channel", channel)
            .header("Priority", "1")
            .header("Async", "true")
    }
}

async fn open(settings: &AmiSettings) -> Result<Connection, AmiError> {
    let addr = format!("{}:{}", settings.host, settings.port);
    let stream = TcpStream::connect(&addr)
        .await
        .map_err(|source| AmiError::Connect {
            addr: addr.clone(),
            source,
        })?;
    let (read, writer) = stream.into_split();
    let mut conn = Connection {
        reader: BufReader::new(read),
        writer,
    };

    let banner = read_banner(&mut conn.reader).await?;
    tracing::info!(%addr, %banner, "connected to AMI");

    let login = Action::new("Login")
        .header("Username", settings.username.clone())
        .header("Secret", settings.secret.expose())
        .header("Events", "off");
    write_action(&mut conn.writer, &login, "dialer-login").await?;
    let reply = read_reply(&mut conn, "dialer-login").await?;
    if reply.status_line() != Some("Success") {
        let reason = reply.get("Message").unwrap_or("no reason given").to_string();
        return Err(AmiError::LoginRejected(reason));
    }
    Ok(conn)
}

async fn round_trip(
    slot: &mut Option<Connection>,
    settings: &AmiSettings,
    action: &Action,
    action_id: &str,
    collect_until: Option<&str>,
) -> Result<Exchange, AmiError> {
    if slot.is_none() {
        *slot = Some(open(settings).await?);
    }
    let conn = slot.as_mut().ok_or(AmiError::ConnectionClosed)?;

    write_action(&mut conn.writer, action, action_id).await?;
    let reply = read_reply(conn, action_id).await?;

    let mut events = Vec::new();
    if let Some(terminator) = collect_until {
        if reply.status_line() == Some("Success") {
            loop {
                let msg = read_message(&mut conn.reader).await?;
                if msg.action_id() != Some(action_id) {
                    continue;
                }
                if msg.event() == Some(terminator) {
                    break;
                }
                events.push(msg);
            }
        }
    }
    Ok(Exchange { reply, events })
}

async fn read_reply(conn: &mut Connection, action_id: &str) -> Result<ProtocolMessage, AmiError> {
    loop {
        let msg = read_message(&mut conn.reader).await?;
        if msg.action_id() == Some(action_id) && msg.contains_key(RESPONSE) {
            return Ok(msg);
        }
        tracing::trace!(message = %msg, "skipping unrelated AMI message");
    }
}

/// Merge a `QueueStatus` reply with the member event for `interface`.
///
/// The member's `Status` (device state) is exposed as `StatusKey`; when the
/// interface is not a member the reply is returned without it.
pub fn fold_queue_status(
    mut reply: ProtocolMessage,
    events: &[ProtocolMessage],
    interface: &str,
) -> ProtocolMessage {
    let member = events.iter().find(|e| {
        e.event() == Some(QUEUE_MEMBER)
            && ["Location", "Interface", "StateInterface"]
                .iter()
                .any(|k| e.get(k) == Some(interface))
    });
    if let Some(member) = member {
        for (key, value) in member.iter() {
            if key != "Event" && key != "ActionID" {
                reply.insert(key, value);
            }
        }
        if let Some(status) = member.get("Status") {
            reply.insert(ResultKey::STATUS_KEY.as_str(), status);
        }
    }
    reply
}

/// Expose modern `Output:` lines under `CmdData`, as legacy replies do.
fn fold_command_output(mut reply: ProtocolMessage) -> ProtocolMessage {
    if !reply.contains_key(ResultKey::CMD_DATA.as_str()) {
        if let Some(output) = reply.remove("Output") {
            reply.insert(ResultKey::CMD_DATA.as_str(), output);
        }
    }
    reply
}

#[async_trait]
impl AmiGateway for AmiClient {
    async fn add_to_queue(&self, cmd: &QueueCommand) -> Result<ProtocolMessage, AmiError> {
        self.send(
            Action::new("QueueAdd")
                .header("Queue", cmd.queue.clone())
                .header("Interface", self.interface(&cmd.inner_number)),
        )
        .await
    }

    async fn remove_from_queue(&self, cmd: &QueueCommand) -> Result<ProtocolMessage, AmiError> {
        self.send(
            Action::new("QueueRemove")
                .header("Queue", cmd.queue.clone())
                .header("Interface", self.interface(&cmd.inner_number)),
        )
        .await
    }

    async fn queue_status(&self, cmd: &QueueCommand) -> Result<ProtocolMessage, AmiError> {
        let interface = self.interface(&cmd.inner_number);
        let action = Action::new("QueueStatus")
            .header("Queue", cmd.queue.clone())
            .header("Member", interface.clone());
        let exchange = self.exchange(action, Some(QUEUE_STATUS_COMPLETE)).await?;
        Ok(fold_queue_status(exchange.reply, &exchange.events, &interface))
    }

    async fn originate_call(&self, cmd: &CallCommand) -> Result<ProtocolMessage, AmiError> {
        self.send(
            self.originate(self.interface(&cmd.inner_number))
                .header("Context", self.settings.outbound_context.clone())
                .header("Exten", cmd.phone_number.clone())
                .header("CallerID", cmd.phone_number.clone()),
        )
        .await
    }

    async fn originate_in_queue(
        &self,
        cmd: &CallInQueueCommand,
    ) -> Result<ProtocolMessage, AmiError> {
        let channel = format!("Local/{}@{}", cmd.phone_number, self.settings.outbound_context);
        self.send(
            self.originate(channel)
                .header("Context", self.settings.queue_context.clone())
                .header("Exten", cmd.queue.clone())
                .header("CallerID", cmd.phone_number.clone()),
        )
        .await
    }

    async fn spy(&self, cmd: &CallCommand) -> Result<ProtocolMessage, AmiError> {
        self.send(
            self.originate(self.interface(&cmd.inner_number))
                .header("Application", "ChanSpy")
                .header("Data", format!("{},q", self.interface(&cmd.phone_number)))
                .header("CallerID", "Spy"),
        )
        .await
    }

    async fn active_channels(&self) -> Result<ProtocolMessage, AmiError> {
        let reply = self
            .send(Action::new("Command").header("Command", SHOW_INUSE))
            .await?;
        Ok(fold_command_output(reply))
    }

    async fn ping(&self) -> Result<ProtocolMessage, AmiError> {
        self.send(Action::new("Ping")).await
    }
}
