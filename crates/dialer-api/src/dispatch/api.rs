//! API-style dispatch: business functions that build their own envelope.

use std::fmt;
use std::future::Future;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, MethodRouter};
use dialer_core::ResponseEnvelope;
use serde::de::DeserializeOwned;

use super::envelope_response;
use crate::binder::{BindingError, RequestParams};
use crate::error::DispatchError;
use crate::state::AppState;

/// Route that binds `C` from plain parameters and runs `business`.
///
/// Binding and business failures both answer HTTP 500 with the error text.
pub fn handle<C, F, Fut>(business: F) -> MethodRouter<AppState>
where
    C: DeserializeOwned + fmt::Debug + Send + 'static,
    F: Fn(AppState, C) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<ResponseEnvelope, DispatchError>> + Send + 'static,
{
    any(
        move |State(state): State<AppState>, params: Result<RequestParams, BindingError>| {
            let business = business.clone();
            async move {
                let command: C = match params.and_then(|p| p.bind()) {
                    Ok(command) => command,
                    Err(err) => return failure(err.into()),
                };
                tracing::info!(?command, "input params");

                match business(state, command).await {
                    Ok(envelope) => {
                        tracing::info!(%envelope, "response");
                        envelope_response(&envelope)
                    }
                    Err(err) => failure(err),
                }
            }
        },
    )
}

fn failure(err: DispatchError) -> Response {
    tracing::error!(error = %err, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
}
