//! # Dispatchers
//!
//! Generic adapters that turn a typed business function into an axum
//! route. Each route is bound to its command type at registration, so a
//! handler can only ever receive the command it was written for.
//!
//! | Adapter         | Business result                  | Failure reporting             |
//! |-----------------|----------------------------------|-------------------------------|
//! | [`api::handle`] | `ResponseEnvelope`               | HTTP 500, error text as body  |
//! | [`ami::bound`]  | `ProtocolMessage` + result key   | HTTP 200, `{status: error}`   |
//!
//! Both write exactly one envelope per request.

pub mod ami;
pub mod api;

use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use dialer_core::ResponseEnvelope;

/// Render an envelope as the response body with status 200.
pub(crate) fn envelope_response(envelope: &ResponseEnvelope) -> Response {
    ([(CONTENT_TYPE, "application/json")], envelope.render()).into_response()
}
