//! # Dispatch Errors
//!
//! Every failure a route can report, folded into one type. The two
//! dispatchers render it differently: API routes answer HTTP 500 with the
//! error text, AMI routes answer HTTP 200 with an error envelope.
//!
//! Collaborator errors (AMI, portal, CDR store) are transparent so their
//! text reaches the caller verbatim.

use dialer_ami::AmiError;
use dialer_crypto::CryptoError;
use dialer_portal_client::PortalError;
use thiserror::Error;

use crate::binder::BindingError;
use crate::db::CdrStoreError;

/// Failure of a dispatched request.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Request parameters did not bind onto the command.
    #[error(transparent)]
    Binding(#[from] BindingError),

    /// The signed envelope is malformed, names an unknown tenant, or its
    /// payload does not decode into the command.
    #[error("signature error: {0}")]
    Signature(String),

    /// The signature does not match the payload.
    #[error("verification error: signature does not match payload")]
    Verification,

    /// AMI gateway failure.
    #[error(transparent)]
    Ami(#[from] AmiError),

    /// Partner portal failure.
    #[error(transparent)]
    Portal(#[from] PortalError),

    /// CDR store failure.
    #[error(transparent)]
    Store(#[from] CdrStoreError),

    /// The collaborator a route needs is not configured.
    #[error("{0} not configured")]
    NotConfigured(&'static str),
}

impl From<CryptoError> for DispatchError {
    fn from(err: CryptoError) -> Self {
        if err.is_verification_failure() {
            Self::Verification
        } else {
            Self::Signature(err.to_string())
        }
    }
}
