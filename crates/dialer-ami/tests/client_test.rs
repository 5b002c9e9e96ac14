//! AmiClient against an in-process fake manager interface.
//!
//! The fake answers `Login` itself (rejecting the secret `wrong`) and hands
//! every other action to the test's responder, which returns raw frames.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dialer_ami::codec::read_message;
use dialer_ami::{AmiClient, AmiError, AmiGateway};
use dialer_core::{AmiSettings, CallCommand, ProtocolMessage, QueueCommand, SecretKey};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// What the fake does after an action: send frames, then maybe hang up.
struct Reply {
    frames: Vec<String>,
    hang_up: bool,
}

impl Reply {
    fn frames(frames: Vec<String>) -> Self {
        Self {
            frames,
            hang_up: false,
        }
    }
}

async fn fake_ami<F>(respond: F) -> AmiSettings
where
    F: Fn(usize, &ProtocolMessage) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let respond = Arc::new(respond);
    let connections = Arc::new(AtomicUsize::new(0));

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let respond = Arc::clone(&respond);
            let conn_no = connections.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let (read, mut write) = stream.into_split();
                let mut reader = BufReader::new(read);
                write
                    .write_all(b"Asterisk Call Manager/5.0.1\r\n")
                    .await
                    .unwrap();
                while let Ok(action) = read_message(&mut reader).await {
                    let id = action.action_id().unwrap_or_default().to_string();
                    if action.get("Action") == Some("Login") {
                        let frame = if action.get("Secret") == Some("wrong") {
                            format!("Response: Error\r\nActionID: {id}\r\nMessage: Authentication failed\r\n\r\n")
                        } else {
                            format!("Response: Success\r\nActionID: {id}\r\nMessage: Authentication accepted\r\n\r\n")
                        };
                        write.write_all(frame.as_bytes()).await.unwrap();
                        continue;
                    }
                    let reply = (*respond)(conn_no, &action);
                    for frame in reply.frames {
                        if write.write_all(frame.as_bytes()).await.is_err() {
                            return;
                        }
                    }
                    if reply.hang_up {
                        return;
                    }
                }
            });
        }
    });

    settings(port, "amipass", 5)
}

fn settings(port: u16, secret: &str, timeout_secs: u64) -> AmiSettings {
    AmiSettings {
        host: "127.0.0.1".into(),
        port,
        username: "dialer".into(),
        secret: SecretKey::new(secret),
        channel_tech: "SIP".into(),
        outbound_context: "outgoing".into(),
        queue_context: "queues".into(),
        timeout_secs,
    }
}

fn id_of(action: &ProtocolMessage) -> String {
    action.action_id().unwrap_or_default().to_string()
}

#[tokio::test]
async fn ping_returns_pong() {
    let settings = fake_ami(|_, action| {
        let id = id_of(action);
        Reply::frames(vec![format!(
            "Response: Success\r\nActionID: {id}\r\nPing: Pong\r\nTimestamp: 1700000000.1\r\n\r\n"
        )])
    })
    .await;

    let client = AmiClient::connect(settings).await.unwrap();
    let reply = client.ping().await.unwrap();
    assert_eq!(reply.get("Ping"), Some("Pong"));
    assert_eq!(reply.status_line(), Some("Success"));
}

#[tokio::test]
async fn unrelated_messages_are_skipped() {
    let settings = fake_ami(|_, action| {
        let id = id_of(action);
        Reply::frames(vec![
            "Event: PeerStatus\r\nPeer: SIP/103\r\n\r\n".to_string(),
            "Response: Success\r\nActionID: someone-else\r\nPing: Pong\r\n\r\n".to_string(),
            format!("Response: Success\r\nActionID: {id}\r\nPing: Pong\r\n\r\n"),
        ])
    })
    .await;

    let client = AmiClient::new(settings);
    let reply = client.ping().await.unwrap();
    assert_eq!(reply.action_id().map(|s| s.starts_with("dialer-")), Some(true));
}

#[tokio::test]
async fn rejected_login_is_reported() {
    let settings = fake_ami(|_, _| Reply::frames(vec![])).await;
    let bad = AmiSettings {
        secret: SecretKey::new("wrong"),
        ..settings
    };
    let err = AmiClient::connect(bad).await.unwrap_err();
    match err {
        AmiError::LoginRejected(reason) => assert_eq!(reason, "Authentication failed"),
        other => panic!("expected LoginRejected, got: {other:?}"),
    }
}

#[tokio::test]
async fn action_level_error_is_a_message_not_an_error() {
    let settings = fake_ami(|_, action| {
        let id = id_of(action);
        Reply::frames(vec![format!(
            "Response: Error\r\nActionID: {id}\r\nMessage: Unable to add interface: Already there\r\n\r\n"
        )])
    })
    .await;

    let client = AmiClient::new(settings);
    let reply = client
        .add_to_queue(&QueueCommand {
            queue: "support".into(),
            inner_number: "101".into(),
        })
        .await
        .unwrap();
    assert_eq!(reply.status_line(), Some("Error"));
    assert_eq!(
        reply.get("Message"),
        Some("Unable to add interface: Already there")
    );
}

#[tokio::test]
async fn queue_status_collects_member_events() {
    let settings = fake_ami(|_, action| {
        assert_eq!(action.get("Action"), Some("QueueStatus"));
        assert_eq!(action.get("Member"), Some("SIP/101"));
        let id = id_of(action);
        Reply::frames(vec![
            format!("Response: Success\r\nActionID: {id}\r\nEventList: start\r\nMessage: Queue status will follow\r\n\r\n"),
            format!("Event: QueueParams\r\nQueue: support\r\nActionID: {id}\r\n\r\n"),
            format!("Event: QueueMember\r\nQueue: support\r\nLocation: SIP/101\r\nStatus: 2\r\nPaused: 0\r\nActionID: {id}\r\n\r\n"),
            format!("Event: QueueStatusComplete\r\nActionID: {id}\r\nEventList: Complete\r\n\r\n"),
        ])
    })
    .await;

    let client = AmiClient::new(settings);
    let reply = client
        .queue_status(&QueueCommand {
            queue: "support".into(),
            inner_number: "101".into(),
        })
        .await
        .unwrap();
    assert_eq!(reply.get("StatusKey"), Some("2"));
    assert_eq!(reply.get("Paused"), Some("0"));
}

#[tokio::test]
async fn legacy_command_output_is_exposed_as_cmd_data() {
    let settings = fake_ami(|_, action| {
        assert_eq!(action.get("Command"), Some("sip show inuse"));
        let id = id_of(action);
        Reply::frames(vec![format!(
            "Response: Follows\r\nPrivilege: Command\r\nActionID: {id}\r\n* Peer name  In use\n101  1/1/-\n--END COMMAND--\r\n\r\n"
        )])
    })
    .await;

    let client = AmiClient::new(settings);
    let reply = client.active_channels().await.unwrap();
    assert!(reply.is_follows());
    assert_eq!(reply.get("CmdData"), Some("* Peer name  In use\n101  1/1/-"));
}

#[tokio::test]
async fn originate_carries_call_descriptor() {
    let settings = fake_ami(|_, action| {
        assert_eq!(action.get("Action"), Some("Originate"));
        assert_eq!(action.get("Channel"), Some("SIP/101"));
        assert_eq!(action.get("Exten"), Some("0501234567"));
        assert_eq!(action.get("Context"), Some("outgoing"));
        assert_eq!(action.get("Async"), Some("true"));
        let id = id_of(action);
        Reply::frames(vec![format!(
            "Response: Success\r\nActionID: {id}\r\nMessage: Originate successfully queued\r\n\r\n"
        )])
    })
    .await;

    let client = AmiClient::new(settings);
    let reply = client
        .originate_call(&CallCommand {
            inner_number: "101".into(),
            phone_number: "0501234567".into(),
            country: None,
        })
        .await
        .unwrap();
    assert_eq!(reply.get("Message"), Some("Originate successfully queued"));
}

#[tokio::test]
async fn reconnects_after_peer_hangs_up() {
    let settings = fake_ami(|conn_no, action| {
        let id = id_of(action);
        Reply {
            frames: vec![format!(
                "Response: Success\r\nActionID: {id}\r\nPing: Pong\r\n\r\n"
            )],
            // The first connection dies right after its first answer.
            hang_up: conn_no == 0,
        }
    })
    .await;

    let client = AmiClient::new(settings);
    assert!(client.ping().await.is_ok());
    assert!(client.ping().await.is_err());
    let reply = client.ping().await.unwrap();
    assert_eq!(reply.get("Ping"), Some("Pong"));
}

#[tokio::test]
async fn silent_peer_times_out() {
    let settings = fake_ami(|_, _| Reply::frames(vec![])).await;
    let client = AmiClient::new(AmiSettings {
        timeout_secs: 1,
        ..settings
    });
    let err = client.ping().await.unwrap_err();
    assert!(matches!(err, AmiError::Timeout(1)), "got: {err:?}");
}

#[tokio::test]
async fn unreachable_gateway_is_connect_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = AmiClient::new(settings(port, "amipass", 2));
    let err = client.ping().await.unwrap_err();
    assert!(matches!(err, AmiError::Connect { .. }), "got: {err:?}");
}
