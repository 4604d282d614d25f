//! Intent and outcome types.

use serde::{Deserialize, Serialize};

use crate::identity::{Identity, TrustedEntry};

/// A requested mutation, submitted by a producer and applied by the
/// dispatcher's consumer loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Trust `public_key` under `identity` with the given nickname.
    ///
    /// `identity: None` targets whichever identity is current when the
    /// intent is applied, not when it was enqueued.
    AddTrustedKey {
        identity: Option<Identity>,
        name: String,
        public_key: String,
    },
    /// Drop `public_key` from `identity`'s trust set.
    RemoveTrustedKey {
        identity: Identity,
        public_key: String,
    },
    /// Make `identity` current; with `seed`, create its empty trust
    /// set first if it is new.
    SwitchIdentity { identity: Identity, seed: bool },
}

/// What a successfully applied intent did, for caller feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    /// The entry now present in the trust set (inserted or refreshed).
    Added(TrustedEntry),
    /// The entry that was removed.
    Removed(TrustedEntry),
    /// The identity that is now current.
    Switched(Identity),
}

impl Intent {
    /// Convenience constructor targeting the current identity.
    pub fn add_trusted_key(name: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self::AddTrustedKey {
            identity: None,
            name: name.into(),
            public_key: public_key.into(),
        }
    }

    /// Convenience constructor for removal.
    pub fn remove_trusted_key(identity: Identity, public_key: impl Into<String>) -> Self {
        Self::RemoveTrustedKey {
            identity,
            public_key: public_key.into(),
        }
    }

    /// Convenience constructor for an identity switch.
    pub fn switch_identity(identity: Identity, seed: bool) -> Self {
        Self::SwitchIdentity { identity, seed }
    }
}
