//! # Signed Envelope
//!
//! The transient `{data, sign, country}` wrapper. It is bound from request
//! parameters like any other command, opened into the real command, and
//! dropped.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use dialer_core::SecretKey;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;
use crate::signing::{sign, verify};

/// Signed payload as carried in request parameters.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope {
    /// URL-safe base64 (no padding) of the JSON payload.
    pub data: String,
    /// Hex HMAC-SHA256 of the decoded payload bytes.
    pub sign: String,
    /// Tenant whose secret signed the payload.
    pub country: String,
}

impl std::fmt::Debug for SignedEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedEnvelope")
            .field("data_len", &self.data.len())
            .field("sign", &"[REDACTED]")
            .field("country", &self.country)
            .finish()
    }
}

impl SignedEnvelope {
    /// Serialize `value` to JSON and sign it for `country`.
    pub fn seal<T: Serialize>(
        value: &T,
        country: impl Into<String>,
        secret: &SecretKey,
    ) -> Result<Self, CryptoError> {
        let payload =
            serde_json::to_vec(value).map_err(|e| CryptoError::Serialization(e.to_string()))?;
        Ok(Self {
            data: URL_SAFE_NO_PAD.encode(&payload),
            sign: sign(secret, &payload)?,
            country: country.into(),
        })
    }

    /// Authenticate the payload and decode it into `T`.
    ///
    /// `secret_for` maps the envelope's tenant to its secret. The steps run
    /// in a fixed order: tenant lookup, base64 decode, signature check, JSON
    /// decode. Nothing is parsed before the signature has been checked.
    pub fn open<'s, T, F>(&self, secret_for: F) -> Result<T, CryptoError>
    where
        T: DeserializeOwned,
        F: FnOnce(&str) -> Option<&'s SecretKey>,
    {
        let secret = secret_for(&self.country)
            .ok_or_else(|| CryptoError::UnknownTenant(self.country.clone()))?;
        let payload = URL_SAFE_NO_PAD
            .decode(self.data.trim_end_matches('=').as_bytes())
            .map_err(|_| CryptoError::PayloadEncoding)?;
        verify(secret, &payload, &self.sign)?;
        serde_json::from_slice(&payload).map_err(|e| CryptoError::Payload(e.to_string()))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn secret() -> SecretKey {
        SecretKey::new("tenant-secret")
    }

    proptest! {
        /// Flipping any single bit of the payload is caught by the signature.
        #[test]
        fn any_bit_flip_fails_verification(
            queue in "[a-z]{1,16}",
            inner in "[0-9]{2,6}",
            byte_seed in any::<usize>(),
            bit in 0u8..8,
        ) {
            let key = secret();
            let value = serde_json::json!({"queue": queue, "inner_number": inner});
            let env = SignedEnvelope::seal(&value, "ua", &key).unwrap();

            let mut payload = URL_SAFE_NO_PAD.decode(&env.data).unwrap();
            let idx = byte_seed % payload.len();
            payload[idx] ^= 1 << bit;

            let tampered = SignedEnvelope {
                data: URL_SAFE_NO_PAD.encode(&payload),
                ..env.clone()
            };
            let err = tampered.open::<serde_json::Value, _>(|_| Some(&key)).unwrap_err();
            prop_assert!(err.is_verification_failure(), "got {err:?}");
        }

        /// A signature made with one secret never verifies under another.
        #[test]
        fn only_matching_secret_accepts(a in "[a-zA-Z0-9]{1,32}", b in "[a-zA-Z0-9]{1,32}") {
            let value = serde_json::json!({"queue": "q", "inner_number": "1"});
            let signer = SecretKey::new(a.clone());
            let checker = SecretKey::new(b.clone());
            let env = SignedEnvelope::seal(&value, "ua", &signer).unwrap();
            let result = env.open::<serde_json::Value, _>(|_| Some(&checker));
            prop_assert_eq!(result.is_ok(), a == b);
        }
    }
}
