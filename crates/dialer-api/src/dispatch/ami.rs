//! AMI-style dispatch: business functions that return a raw gateway reply.
//!
//! The reply is never forwarded. The envelope is derived from it by
//! [`envelope_from_message`] using the route's [`ResultKey`]: the key's
//! presence alone decides `status`, whatever the reply's `Response` line
//! says. Every outcome, failures included, is written with HTTP 200 because
//! AMI-facing consumers read the body, not the status code.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::routing::{any, MethodRouter};
use dialer_ami::AmiGateway;
use dialer_core::{envelope_from_message, ProtocolMessage, ResponseEnvelope, ResultKey};
use serde::de::DeserializeOwned;

use super::envelope_response;
use crate::binder::{BindingError, RequestParams};
use crate::error::DispatchError;
use crate::state::AppState;
use crate::verifier::{bind_command, BindMode};

/// Gateway reply plus the key that becomes the envelope's `response`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmiReply {
    pub message: ProtocolMessage,
    pub result_key: ResultKey,
}

impl AmiReply {
    pub fn new(message: ProtocolMessage, result_key: ResultKey) -> Self {
        Self {
            message,
            result_key,
        }
    }
}

/// Route that recovers `C` according to `mode` and runs `business`
/// against the configured gateway.
pub fn bound<C, F, Fut>(mode: BindMode, business: F) -> MethodRouter<AppState>
where
    C: DeserializeOwned + fmt::Debug + Send + 'static,
    F: Fn(Arc<dyn AmiGateway>, C) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<AmiReply, DispatchError>> + Send + 'static,
{
    any(
        move |State(state): State<AppState>, params: Result<RequestParams, BindingError>| {
            let business = business.clone();
            async move {
                let command: C = match params
                    .map_err(DispatchError::from)
                    .and_then(|p| bind_command(mode, &p, &state.config))
                {
                    Ok(command) => command,
                    Err(err) => return in_band_error(err),
                };
                tracing::info!(?command, "input params");

                let result = match state.ami() {
                    Ok(gateway) => business(gateway, command).await,
                    Err(err) => Err(err),
                };
                respond(result)
            }
        },
    )
}

/// Route for operations that take no parameters.
pub fn unbound<F, Fut>(business: F) -> MethodRouter<AppState>
where
    F: Fn(Arc<dyn AmiGateway>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<AmiReply, DispatchError>> + Send + 'static,
{
    any(move |State(state): State<AppState>| {
        let business = business.clone();
        async move {
            let result = match state.ami() {
                Ok(gateway) => business(gateway).await,
                Err(err) => Err(err),
            };
            respond(result)
        }
    })
}

fn respond(result: Result<AmiReply, DispatchError>) -> Response {
    let reply = match result {
        Ok(reply) => reply,
        Err(err) => return in_band_error(err),
    };

    // Follows bodies are unbounded CLI output.
    if reply.message.is_follows() {
        tracing::info!("<<< response follows");
    } else {
        tracing::info!(message = %reply.message, "<<< response");
    }

    envelope_response(&envelope_from_message(&reply.message, reply.result_key))
}

fn in_band_error(err: DispatchError) -> Response {
    tracing::error!(error = %err, "AMI request failed");
    envelope_response(&ResponseEnvelope::error(err.to_string()))
}
