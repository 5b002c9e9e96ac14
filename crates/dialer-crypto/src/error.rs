//! # Cryptographic Error Types
//!
//! Error texts name the stage that failed. They never include the secret,
//! the signature or the payload.

use thiserror::Error;

/// Errors from signing, sealing and opening envelopes.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The `data` parameter is not valid base64.
    #[error("signed envelope payload is not valid base64")]
    PayloadEncoding,

    /// The `sign` parameter is not a hex-encoded digest.
    #[error("signed envelope signature is malformed")]
    MalformedSignature,

    /// No secret is configured for the envelope's tenant.
    #[error("unknown tenant: {0}")]
    UnknownTenant(String),

    /// The signature does not match the payload.
    #[error("signature verification failed")]
    VerificationFailed,

    /// The authenticated payload does not decode into the target type.
    #[error("signed payload does not match the expected parameters: {0}")]
    Payload(String),

    /// The secret cannot key the MAC.
    #[error("signing key rejected")]
    InvalidKey,

    /// The value to seal could not be serialized.
    #[error("cannot serialize payload: {0}")]
    Serialization(String),
}

impl CryptoError {
    /// Whether this is a signature mismatch rather than a malformed envelope.
    pub fn is_verification_failure(&self) -> bool {
        matches!(self, Self::VerificationFailed)
    }
}
