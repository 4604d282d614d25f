//! Pluggable key validation.
//!
//! The store is agnostic to the key-format/crypto scheme in use; it
//! only asks a [`KeyValidator`] whether raw key material is
//! syntactically well-formed before admitting it into a trust set.

use ed25519_dalek::VerifyingKey;

/// Confirms that raw key material is syntactically well-formed.
///
/// Implementations must be cheap and side-effect free: validation runs
/// inside the store's mutation critical section.
pub trait KeyValidator: Send + Sync {
    /// Return `true` if `raw_key` is acceptable as a trusted public key.
    fn validate(&self, raw_key: &str) -> bool;
}

/// Accepts base64-encoded 32-byte Ed25519 public keys that decode to a
/// valid curve point.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519Validator;

impl KeyValidator for Ed25519Validator {
    fn validate(&self, raw_key: &str) -> bool {
        let Ok(bytes) = base64::Engine::decode(
            &base64::engine::general_purpose::STANDARD,
            raw_key.trim(),
        ) else {
            return false;
        };

        let Ok(key_bytes) = <[u8; 32]>::try_from(bytes.as_slice()) else {
            return false;
        };

        VerifyingKey::from_bytes(&key_bytes).is_ok()
    }
}

/// Accepts any non-empty key. For tests and hosts that validate upstream.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl KeyValidator for AcceptAll {
    fn validate(&self, raw_key: &str) -> bool {
        !raw_key.trim().is_empty()
    }
}
