//! Relays to the tenant's partner portal.
//!
//! The portal's body is returned untouched inside the envelope: under
//! `status` for notifications and under `inner_number` for lookups.

use dialer_core::envelope::STATUS;
use dialer_core::{PhoneCallCommand, ResponseEnvelope};

use crate::binder::BindingError;
use crate::error::DispatchError;
use crate::state::AppState;

/// Envelope key holding a looked-up agent extension.
pub const INNER_NUMBER: &str = "inner_number";

fn require<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, DispatchError> {
    value
        .as_deref()
        .ok_or(DispatchError::Binding(BindingError::Missing(name)))
}

pub async fn manager_call_after_hours(
    state: AppState,
    cmd: PhoneCallCommand,
) -> Result<ResponseEnvelope, DispatchError> {
    let calling_phone = require(&cmd.calling_phone, "calling_phone")?;
    let raw = state
        .portals
        .manager_call_after_hours(&cmd.country, calling_phone)
        .await?;
    Ok(ResponseEnvelope::new().with(STATUS, raw))
}

pub async fn show_calling_review(
    state: AppState,
    cmd: PhoneCallCommand,
) -> Result<ResponseEnvelope, DispatchError> {
    let review_href = require(&cmd.review_href, "review_href")?;
    let inner_number = require(&cmd.inner_number, "inner_number")?;
    let raw = state
        .portals
        .show_calling_review(&cmd.country, review_href, inner_number)
        .await?;
    Ok(ResponseEnvelope::new().with(STATUS, raw))
}

pub async fn show_calling_popup(
    state: AppState,
    cmd: PhoneCallCommand,
) -> Result<ResponseEnvelope, DispatchError> {
    let inner_number = require(&cmd.inner_number, "inner_number")?;
    let calling_phone = require(&cmd.calling_phone, "calling_phone")?;
    let raw = state
        .portals
        .show_calling_popup(&cmd.country, inner_number, calling_phone)
        .await?;
    Ok(ResponseEnvelope::new().with(STATUS, raw))
}

pub async fn manager_phone(
    state: AppState,
    cmd: PhoneCallCommand,
) -> Result<ResponseEnvelope, DispatchError> {
    let calling_phone = require(&cmd.calling_phone, "calling_phone")?;
    let raw = state
        .portals
        .manager_phone(&cmd.country, calling_phone)
        .await?;
    Ok(ResponseEnvelope::new().with(INNER_NUMBER, raw))
}

pub async fn manager_phone_for_company(
    state: AppState,
    cmd: PhoneCallCommand,
) -> Result<ResponseEnvelope, DispatchError> {
    let id = require(&cmd.id, "id")?;
    let raw = state
        .portals
        .manager_phone_for_company(&cmd.country, id)
        .await?;
    Ok(ResponseEnvelope::new().with(INNER_NUMBER, raw))
}
