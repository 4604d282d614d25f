//! Identity and trusted-entry types.
//!
//! An identity is the public key of the user whose trust list is being
//! tracked; it is opaque to the store and immutable once created. A
//! trusted entry pairs another identity's public key with a
//! user-assigned nickname.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// An identity, identified by its public key string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub String);

impl Identity {
    /// Create an identity from raw public key material.
    pub fn new(public_key: impl Into<String>) -> Self {
        Self(public_key.into())
    }

    /// Return the full public key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short display form for log lines: `tid_` + base58 of the first
    /// 16 bytes of SHA-256(public_key).
    ///
    /// Log output uses this instead of the raw key so that key material
    /// never lands in logs.
    pub fn fingerprint(&self) -> String {
        let hash = Sha256::digest(self.0.as_bytes());
        let truncated = &hash[..16];
        format!("tid_{}", bs58::encode(truncated).into_string())
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A (nickname, public key) pair inside one identity's trust set.
///
/// The public key is unique within the set and immutable; the name may
/// be refreshed by re-adding the same key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedEntry {
    /// User-assigned nickname for the trusted key.
    pub name: String,
    /// The trusted public key.
    pub public_key: String,
}

impl TrustedEntry {
    /// Create a new trusted entry.
    pub fn new(name: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public_key: public_key.into(),
        }
    }

    /// The trusted key viewed as an identity of its own.
    pub fn identity(&self) -> Identity {
        Identity::new(self.public_key.clone())
    }
}
