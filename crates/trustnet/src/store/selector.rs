//! Current-identity selection.
//!
//! A thin pointer into the store's keyspace: which identity's trust
//! set is "active" for display and filtering. The selector shares the
//! store's mutex, so a switch is atomic with respect to every other
//! mutation and publishes a snapshot like one.

use std::sync::Arc;

use crate::error::Result;
use crate::identity::{Identity, TrustedEntry};
use crate::store::TrustStore;

/// Handle over a shared store exposing only identity selection and the
/// current identity's view.
#[derive(Debug, Clone)]
pub struct CurrentIdentitySelector {
    store: Arc<TrustStore>,
}

impl CurrentIdentitySelector {
    /// Create a selector over `store`.
    pub fn new(store: Arc<TrustStore>) -> Self {
        Self { store }
    }

    /// The active identity.
    pub fn current(&self) -> Identity {
        self.store.current()
    }

    /// Switch to an identity already known to the mapping.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::UnknownIdentity` for identities that were
    /// never seeded; switching never creates state implicitly.
    pub fn switch_to(&self, identity: &Identity) -> Result<()> {
        self.store.switch_to(identity)
    }

    /// Switch to an identity, explicitly seeding its empty trust set if
    /// it is new.
    pub fn switch_to_seeding(&self, identity: &Identity) -> Result<()> {
        self.store.switch_to_seeding(identity)
    }

    /// Trust set of the active identity, for filtered views.
    pub fn trusted_by_current(&self) -> Vec<TrustedEntry> {
        self.store.list_trusted(&self.store.current())
    }
}
