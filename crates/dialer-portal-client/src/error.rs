//! Portal client errors.

use thiserror::Error;

/// Errors calling a partner portal.
#[derive(Error, Debug)]
pub enum PortalError {
    /// No agency is configured for the country.
    #[error("no agency configured for country '{0}'")]
    UnknownTenant(String),

    /// The endpoint URL could not be built from the tenant's base URL.
    #[error("invalid portal URL for {endpoint}: {reason}")]
    Url {
        /// Endpoint being called.
        endpoint: String,
        /// Parse failure.
        reason: String,
    },

    /// The request could not be signed.
    #[error("cannot sign portal request: {0}")]
    Signing(#[from] dialer_crypto::CryptoError),

    /// Transport failure (connect, timeout, TLS).
    #[error("portal request {endpoint} failed: {source}")]
    Http {
        /// Endpoint being called.
        endpoint: String,
        /// Underlying error.
        source: reqwest::Error,
    },

    /// The portal answered with a non-success status.
    #[error("portal {endpoint} returned {status}: {body}")]
    ApiError {
        /// Endpoint being called.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body, as sent.
        body: String,
    },
}
