//! # dialer-crypto -- Signed Request Envelopes
//!
//! Inbound AMI requests may arrive signed by a tenant instead of carrying
//! plain parameters, and outbound partner-portal calls are always signed.
//! Both directions use the same scheme:
//!
//! - **Payload**: a JSON object, transported as URL-safe base64 without
//!   padding in the `data` parameter.
//! - **Signature**: lower-case hex HMAC-SHA256 over the raw payload bytes,
//!   keyed by the tenant secret, in the `sign` parameter.
//! - **Tenant**: the `country` parameter selects the secret.
//!
//! The payload is authenticated before it is parsed, so a tampered payload
//! is always reported as [`CryptoError::VerificationFailed`].

pub mod envelope;
pub mod error;
pub mod signing;

pub use envelope::SignedEnvelope;
pub use error::CryptoError;
pub use signing::{sign, verify};
