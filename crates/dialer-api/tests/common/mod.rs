//! Shared fixtures: in-memory collaborators and request helpers.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use dialer_ami::{AmiError, AmiGateway};
use dialer_api::db::{CdrRecord, CdrStore, CdrStoreError};
use dialer_api::state::{AppConfig, AppState};
use dialer_core::{CallCommand, CallInQueueCommand, DialerConfig, ProtocolMessage, QueueCommand};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const SECRET: &str = "ua-secret";

/// Configuration with one tenant, `ua`, whose portal lives at `portal_base`.
pub fn config(portal_base: &str) -> DialerConfig {
    DialerConfig::from_json(&format!(
        r#"{{
            "Name": "Kyiv <main>",
            "Agencies": {{
                "ua": {{"CompanyId": "42", "Secret": "{SECRET}", "ApiBaseUrl": "{portal_base}"}}
            }}
        }}"#
    ))
    .unwrap()
}

pub fn state() -> AppState {
    state_with(config("http://127.0.0.1:9/portal/"), false)
}

pub fn state_with(config: DialerConfig, signed_input: bool) -> AppState {
    let app_config = AppConfig {
        signed_input,
        ..AppConfig::default()
    };
    AppState::new(config, app_config).unwrap()
}

/// Send a request and return status and body text.
pub async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_form(app: axum::Router, uri: &str, form: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app, request).await
}

pub fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("not JSON ({e}): {body}"))
}

// -- AMI gateway --------------------------------------------------------------

type Script = Box<dyn Fn(&str) -> Result<ProtocolMessage, AmiError> + Send + Sync>;

/// Gateway that records each call as `"<operation> <detail>"` and answers
/// from a script keyed by operation name.
pub struct FakeGateway {
    calls: Mutex<Vec<String>>,
    script: Script,
}

impl FakeGateway {
    pub fn new(
        script: impl Fn(&str) -> Result<ProtocolMessage, AmiError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            script: Box::new(script),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, op: &str, detail: String) -> Result<ProtocolMessage, AmiError> {
        self.calls.lock().unwrap().push(format!("{op} {detail}").trim_end().to_string());
        (self.script)(op)
    }
}

pub fn message(pairs: &[(&str, &str)]) -> ProtocolMessage {
    pairs.iter().copied().collect()
}

#[async_trait]
impl AmiGateway for FakeGateway {
    async fn add_to_queue(&self, cmd: &QueueCommand) -> Result<ProtocolMessage, AmiError> {
        self.answer("add_to_queue", format!("{}/{}", cmd.queue, cmd.inner_number))
    }

    async fn remove_from_queue(&self, cmd: &QueueCommand) -> Result<ProtocolMessage, AmiError> {
        self.answer("remove_from_queue", format!("{}/{}", cmd.queue, cmd.inner_number))
    }

    async fn queue_status(&self, cmd: &QueueCommand) -> Result<ProtocolMessage, AmiError> {
        self.answer("queue_status", format!("{}/{}", cmd.queue, cmd.inner_number))
    }

    async fn originate_call(&self, cmd: &CallCommand) -> Result<ProtocolMessage, AmiError> {
        self.answer("originate_call", format!("{}->{}", cmd.inner_number, cmd.phone_number))
    }

    async fn originate_in_queue(
        &self,
        cmd: &CallInQueueCommand,
    ) -> Result<ProtocolMessage, AmiError> {
        self.answer("originate_in_queue", format!("{}->{}", cmd.phone_number, cmd.queue))
    }

    async fn spy(&self, cmd: &CallCommand) -> Result<ProtocolMessage, AmiError> {
        self.answer("spy", format!("{}->{}", cmd.inner_number, cmd.phone_number))
    }

    async fn active_channels(&self) -> Result<ProtocolMessage, AmiError> {
        self.answer("active_channels", String::new())
    }

    async fn ping(&self) -> Result<ProtocolMessage, AmiError> {
        self.answer("ping", String::new())
    }
}

// -- CDR store ----------------------------------------------------------------

/// Store holding at most one record; `fail` makes every call a database error.
pub struct FakeCdrStore {
    pub record: Option<CdrRecord>,
    pub deleted_rows: u64,
    pub count: i64,
    pub fail: bool,
    pub deletes: Mutex<Vec<i64>>,
}

impl FakeCdrStore {
    pub fn new() -> Self {
        Self {
            record: None,
            deleted_rows: 0,
            count: 0,
            fail: false,
            deletes: Mutex::new(Vec::new()),
        }
    }

    fn check(&self) -> Result<(), CdrStoreError> {
        if self.fail {
            return Err(CdrStoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl CdrStore for FakeCdrStore {
    async fn get_cdr(&self, unique_id: &str) -> Result<CdrRecord, CdrStoreError> {
        self.check()?;
        self.record
            .clone()
            .filter(|r| r.uniqueid == unique_id)
            .ok_or_else(|| CdrStoreError::NotFound(unique_id.to_string()))
    }

    async fn delete_cdr(&self, id: i64) -> Result<u64, CdrStoreError> {
        self.check()?;
        self.deletes.lock().unwrap().push(id);
        Ok(self.deleted_rows)
    }

    async fn count(&self) -> Result<i64, CdrStoreError> {
        self.check()?;
        Ok(self.count)
    }
}

pub fn sample_cdr() -> CdrRecord {
    CdrRecord {
        id: 7,
        calldate: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        clid: "\"Ivan\" <0501234567>".into(),
        src: "0501234567".into(),
        dst: "101".into(),
        dcontext: "incoming".into(),
        channel: "SIP/trunk-0001".into(),
        dstchannel: "SIP/101-0002".into(),
        lastapp: "Dial".into(),
        lastdata: "SIP/101".into(),
        duration: 65,
        billsec: 60,
        disposition: "ANSWERED".into(),
        uniqueid: "1700000000.42".into(),
        userfield: String::new(),
    }
}
