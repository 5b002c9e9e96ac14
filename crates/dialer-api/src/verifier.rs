//! # Signed Input
//!
//! Optional stage in front of parameter binding. In [`BindMode::Signed`]
//! the request carries a [`SignedEnvelope`] (`data`, `sign`, `country`)
//! instead of the command's own parameters. The envelope is bound with the
//! ordinary binder, authenticated with the tenant's secret and only then
//! decoded into the command.

use dialer_core::DialerConfig;
use dialer_crypto::SignedEnvelope;
use serde::de::DeserializeOwned;

use crate::binder::RequestParams;
use crate::error::DispatchError;

/// How a route recovers its command from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindMode {
    /// Bind request parameters directly.
    #[default]
    Plain,
    /// Authenticate and unwrap a signed envelope first.
    Signed,
}

impl BindMode {
    /// Mode for a startup `signed_input` flag.
    pub fn from_flag(signed: bool) -> Self {
        if signed {
            Self::Signed
        } else {
            Self::Plain
        }
    }
}

/// Recover a command from `params` according to `mode`.
///
/// Tenant secrets are looked up in `config` by the envelope's `country`.
pub fn bind_command<C: DeserializeOwned>(
    mode: BindMode,
    params: &RequestParams,
    config: &DialerConfig,
) -> Result<C, DispatchError> {
    match mode {
        BindMode::Plain => Ok(params.bind()?),
        BindMode::Signed => {
            let envelope: SignedEnvelope = params
                .bind()
                .map_err(|e| DispatchError::Signature(e.to_string()))?;
            tracing::info!(?envelope, "signed params");
            Ok(envelope.open(|country| config.agency(country).map(|a| &a.secret))?)
        }
    }
}
