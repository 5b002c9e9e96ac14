//! # Parameter Binding
//!
//! Collects a request's parameters and binds them onto a typed command.
//!
//! Parameters are read from the URL query string and, when the body is
//! `application/x-www-form-urlencoded`, from the body. A name present in
//! both takes the body value; a repeated name keeps its first value. The
//! merged set is deserialized with `serde_urlencoded`, which performs the
//! textual-to-numeric conversions the command types declare.
//!
//! Binding knows nothing about the dispatcher that asked for it. API and
//! AMI routes bind identically; they only differ in how a failure is
//! reported.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A required parameter is missing or does not convert.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// The request body could not be read.
    #[error("cannot read request body: {0}")]
    Body(String),

    /// The query string or form body is not URL-encoded.
    #[error("malformed request parameters: {0}")]
    Malformed(String),

    /// A field is missing or fails conversion.
    #[error("invalid request parameters: {0}")]
    Invalid(String),

    /// A parameter the operation needs was not supplied.
    #[error("missing parameter: {0}")]
    Missing(&'static str),
}

impl IntoResponse for BindingError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Merged request parameters, in precedence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pairs: Vec<(String, String)>,
}

impl RequestParams {
    /// Merge a raw query string and a raw form body.
    pub fn from_raw(query: Option<&str>, body: Option<&[u8]>) -> Result<Self, BindingError> {
        let query = match query {
            Some(raw) => decode(raw.as_bytes())?,
            None => Vec::new(),
        };
        let body = match body {
            Some(raw) => decode(raw)?,
            None => Vec::new(),
        };

        let mut pairs: Vec<(String, String)> = Vec::with_capacity(query.len() + body.len());
        for (name, value) in body.into_iter().chain(query) {
            if !pairs.iter().any(|(seen, _)| *seen == name) {
                pairs.push((name, value));
            }
        }
        Ok(Self { pairs })
    }

    /// Value of a parameter, if supplied.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether no parameters were supplied.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Deserialize the parameters into `C`.
    ///
    /// Either every required field of `C` is populated or an error is
    /// returned; a partially bound command is never produced.
    pub fn bind<C: DeserializeOwned>(&self) -> Result<C, BindingError> {
        let encoded = serde_urlencoded::to_string(&self.pairs)
            .map_err(|e| BindingError::Malformed(e.to_string()))?;
        serde_urlencoded::from_str(&encoded).map_err(|e| BindingError::Invalid(e.to_string()))
    }
}

fn decode(raw: &[u8]) -> Result<Vec<(String, String)>, BindingError> {
    serde_urlencoded::from_bytes(raw).map_err(|e| BindingError::Malformed(e.to_string()))
}

impl<S: Send + Sync> FromRequest<S> for RequestParams {
    type Rejection = BindingError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = req.uri().query().map(str::to_owned);
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with(FORM_CONTENT_TYPE));

        let body = if is_form {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| BindingError::Body(e.body_text()))?;
            Some(bytes)
        } else {
            None
        };

        Self::from_raw(query.as_deref(), body.as_deref())
    }
}
