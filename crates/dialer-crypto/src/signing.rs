//! # HMAC-SHA256 Signatures
//!
//! Signatures are lower-case hex. Verification goes through
//! [`Mac::verify_slice`], which compares in constant time.

use dialer_core::SecretKey;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CryptoError;

type HmacSha256 = Hmac<Sha256>;

fn keyed(secret: &SecretKey) -> Result<HmacSha256, CryptoError> {
    HmacSha256::new_from_slice(secret.expose().as_bytes()).map_err(|_| CryptoError::InvalidKey)
}

/// Sign `payload` with `secret`, returning the hex signature.
pub fn sign(secret: &SecretKey, payload: &[u8]) -> Result<String, CryptoError> {
    let mut mac = keyed(secret)?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a hex `signature` over `payload`.
pub fn verify(secret: &SecretKey, payload: &[u8], signature: &str) -> Result<(), CryptoError> {
    let expected = hex::decode(signature.trim()).map_err(|_| CryptoError::MalformedSignature)?;
    let mut mac = keyed(secret)?;
    mac.update(payload);
    mac.verify_slice(&expected)
        .map_err(|_| CryptoError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SecretKey {
        SecretKey::new("key")
    }

    #[test]
    fn matches_known_vector() {
        // HMAC-SHA256("key", "The quick brown fox jumps over the lazy dog")
        let sig = sign(&key(), b"The quick brown fox jumps over the lazy dog").unwrap();
        assert_eq!(
            sig,
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn verify_accepts_own_signature() {
        let sig = sign(&key(), b"payload").unwrap();
        assert!(verify(&key(), b"payload", &sig).is_ok());
    }

    #[test]
    fn verify_accepts_uppercase_hex() {
        let sig = sign(&key(), b"payload").unwrap().to_uppercase();
        assert!(verify(&key(), b"payload", &sig).is_ok());
    }

    #[test]
    fn verify_rejects_other_secret() {
        let sig = sign(&key(), b"payload").unwrap();
        let err = verify(&SecretKey::new("other"), b"payload", &sig).unwrap_err();
        assert!(err.is_verification_failure());
    }

    #[test]
    fn verify_rejects_truncated_signature() {
        let sig = sign(&key(), b"payload").unwrap();
        let err = verify(&key(), b"payload", &sig[..32]).unwrap_err();
        assert!(err.is_verification_failure());
    }

    #[test]
    fn non_hex_signature_is_malformed() {
        let err = verify(&key(), b"payload", "zz-not-hex").unwrap_err();
        assert!(matches!(err, CryptoError::MalformedSignature));
    }
}
