//! Immutable snapshots of the trust mapping.
//!
//! A snapshot is a full copy of the mapping taken at one point in the
//! mutation sequence. Readers and subscribers work from snapshots so
//! they can never observe a partially applied mutation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identity::{Identity, TrustedEntry};

/// Point-in-time copy of the entire trust mapping.
///
/// `version` increases by exactly one per committed mutation, so two
/// snapshots from the same store are ordered by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustSnapshot {
    /// Position in the store's mutation sequence.
    pub version: u64,
    /// The identity that was current when the snapshot was taken.
    pub current: Identity,
    /// Every known identity's trust set, in insertion order per set.
    pub mapping: BTreeMap<Identity, Vec<TrustedEntry>>,
}

impl TrustSnapshot {
    /// Trust set for `identity` in insertion order; empty for
    /// identities without entries.
    pub fn list_trusted(&self, identity: &Identity) -> &[TrustedEntry] {
        self.mapping
            .get(identity)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether `identity` trusts `public_key`.
    pub fn contains(&self, identity: &Identity, public_key: &str) -> bool {
        self.list_trusted(identity)
            .iter()
            .any(|e| e.public_key == public_key)
    }

    /// All identities known to the mapping.
    pub fn identities(&self) -> impl Iterator<Item = &Identity> {
        self.mapping.keys()
    }
}
