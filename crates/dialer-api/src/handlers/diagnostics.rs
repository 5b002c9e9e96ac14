//! Operator-facing diagnostics.

use axum::extract::State;
use axum::response::{Html, Response};
use dialer_core::{EnvelopeStatus, ResponseEnvelope};

use crate::dispatch::envelope_response;
use crate::state::AppState;

/// Envelope key holding the CDR count.
pub const NUMBER_OF_CDRS: &str = "number_of_cdrs";

/// Liveness body.
pub const IM_UP: &str = "Im up, Im up...";

/// Probe every configured portal.
///
/// One key per country, holding `ok` or the probe's error text. `status`
/// is `success` only when every probe answered.
pub async fn check_portals(State(state): State<AppState>) -> Response {
    let mut results = Vec::new();
    for country in state.portals.countries() {
        match state.portals.check(country).await {
            Ok(()) => results.push((country.to_string(), "ok".to_string())),
            Err(err) => {
                tracing::error!(country, error = %err, "portal check failed");
                results.push((country.to_string(), err.to_string()));
            }
        }
    }

    let all_ok = results.iter().all(|(_, outcome)| outcome == "ok");
    let status = if all_ok {
        EnvelopeStatus::Success
    } else {
        EnvelopeStatus::Error
    };
    let envelope = results
        .into_iter()
        .fold(ResponseEnvelope::with_status(status), |env, (country, outcome)| {
            env.with(country, outcome)
        });
    envelope_response(&envelope)
}

/// Small HTML page with the installation name and CDR count.
pub async fn stats(State(state): State<AppState>) -> Html<String> {
    let count = match cdr_count_of(&state).await {
        Ok(count) => count.to_string(),
        Err(err) => {
            tracing::error!(error = %err, "cannot count CDRs for stats page");
            "n/a".to_string()
        }
    };
    Html(format!(
        "<h1>{} dialer stats</h1> <b>DB CDR</b>: {}",
        escape_html(&state.config.name),
        count
    ))
}

/// `{number_of_cdrs: <n>}`, or an error envelope.
pub async fn cdr_count(State(state): State<AppState>) -> Response {
    let envelope = match cdr_count_of(&state).await {
        Ok(count) => ResponseEnvelope::new().with(NUMBER_OF_CDRS, count.to_string()),
        Err(err) => {
            tracing::error!(error = %err, "cannot count CDRs");
            ResponseEnvelope::error(err.to_string())
        }
    };
    envelope_response(&envelope)
}

pub async fn im_up() -> &'static str {
    IM_UP
}

async fn cdr_count_of(state: &AppState) -> Result<i64, crate::error::DispatchError> {
    Ok(state.cdr_store()?.count().await?)
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
