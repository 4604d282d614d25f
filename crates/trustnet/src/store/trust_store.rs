//! The authoritative trust mapping.
//!
//! All store state — the mapping, the current identity, and the
//! version counter — lives behind one mutex, so every mutation is
//! atomic from a reader's point of view: validate, mutate, snapshot,
//! and publish happen as one indivisible step. Reads clone out of the
//! critical section and never observe a torn map.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::{Result, TrustError};
use crate::hub::{SnapshotReceiver, SubscriptionHandle, SubscriptionHub};
use crate::identity::{Identity, TrustedEntry};
use crate::storage::PersistedMapping;
use crate::validator::KeyValidator;

use super::snapshot::TrustSnapshot;

/// Mutable state guarded by the store's single mutex.
#[derive(Debug)]
struct StoreState {
    /// Identity → trust set, each set in insertion order and keyed by
    /// public key for uniqueness.
    mapping: BTreeMap<Identity, Vec<TrustedEntry>>,
    /// The active identity. Always present as a key in `mapping`.
    current: Identity,
    /// Committed mutation count.
    version: u64,
}

impl StoreState {
    fn snapshot(&self) -> TrustSnapshot {
        TrustSnapshot {
            version: self.version,
            current: self.current.clone(),
            mapping: self.mapping.clone(),
        }
    }
}

/// Identity-keyed store of trusted public keys.
///
/// Mutations normally arrive through the
/// [`ActionDispatcher`](crate::dispatch::ActionDispatcher), which
/// serializes them; calling the mutation methods directly from several
/// threads is still safe, only the relative order is then up to the
/// scheduler.
pub struct TrustStore {
    state: Mutex<StoreState>,
    hub: SubscriptionHub,
    validator: Box<dyn KeyValidator>,
}

impl std::fmt::Debug for TrustStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustStore")
            .field("state", &self.state)
            .field("subscribers", &self.hub.subscriber_count())
            .finish()
    }
}

impl TrustStore {
    /// Create a store for `current`, pre-seeding its empty trust set.
    pub fn new(current: Identity, validator: Box<dyn KeyValidator>) -> Self {
        let mut mapping = BTreeMap::new();
        mapping.insert(current.clone(), Vec::new());
        Self {
            state: Mutex::new(StoreState {
                mapping,
                current,
                version: 0,
            }),
            hub: SubscriptionHub::new(),
            validator,
        }
    }

    /// Restore a store from a previously persisted mapping.
    ///
    /// If the persisted current identity has no mapping entry (it never
    /// trusted anyone), its empty set is seeded so the current identity
    /// is always a valid key into the mapping.
    pub fn from_persisted(persisted: PersistedMapping, validator: Box<dyn KeyValidator>) -> Self {
        let PersistedMapping {
            current,
            mut mapping,
        } = persisted;
        mapping.entry(current.clone()).or_default();
        Self {
            state: Mutex::new(StoreState {
                mapping,
                current,
                version: 0,
            }),
            hub: SubscriptionHub::new(),
            validator,
        }
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Insert or refresh a trusted key under `identity`, or under the
    /// current identity when `identity` is `None` (resolved at
    /// application time, not enqueue time).
    ///
    /// Re-adding a key that is already trusted overwrites its nickname
    /// in place; the entry keeps its position in the set.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::InvalidKey` if the validator rejects
    /// `public_key`, or `TrustError::UnknownIdentity` if an explicit
    /// `identity` is not present in the mapping. Unknown identities are
    /// never created implicitly; seed them via
    /// [`seed_identity`](Self::seed_identity) or an identity switch.
    pub fn add_trusted_key(
        &self,
        identity: Option<&Identity>,
        name: &str,
        public_key: &str,
    ) -> Result<TrustedEntry> {
        let mut state = self.lock_state();

        if !self.validator.validate(public_key) {
            let probe = Identity::new(public_key.to_string());
            log::debug!("rejected key {} for trust add", probe.fingerprint());
            return Err(TrustError::InvalidKey(probe.fingerprint()));
        }

        let target = match identity {
            Some(id) => {
                if !state.mapping.contains_key(id) {
                    return Err(TrustError::UnknownIdentity(id.fingerprint()));
                }
                id.clone()
            }
            None => state.current.clone(),
        };

        let entry = TrustedEntry::new(name, public_key);
        let set = state
            .mapping
            .get_mut(&target)
            .expect("target identity checked above");
        match set.iter_mut().find(|e| e.public_key == public_key) {
            Some(existing) => existing.name = entry.name.clone(),
            None => set.push(entry.clone()),
        }

        log::debug!(
            "trusted {} as {:?} under {}",
            entry.identity().fingerprint(),
            entry.name,
            target.fingerprint()
        );
        self.commit(&mut state);
        Ok(entry)
    }

    /// Remove the entry for `public_key` from `identity`'s trust set,
    /// returning it.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::UnknownIdentity` if `identity` is not in
    /// the mapping, or `TrustError::NotFound` if the identity holds no
    /// entry for that key. A repeated remove deterministically yields
    /// `NotFound` and leaves the set unchanged.
    pub fn remove_trusted_key(&self, identity: &Identity, public_key: &str) -> Result<TrustedEntry> {
        let mut state = self.lock_state();

        let set = state
            .mapping
            .get_mut(identity)
            .ok_or_else(|| TrustError::UnknownIdentity(identity.fingerprint()))?;

        let position = set
            .iter()
            .position(|e| e.public_key == public_key)
            .ok_or_else(|| {
                TrustError::NotFound(Identity::new(public_key.to_string()).fingerprint())
            })?;
        let removed = set.remove(position);

        log::debug!(
            "untrusted {} under {}",
            removed.identity().fingerprint(),
            identity.fingerprint()
        );
        self.commit(&mut state);
        Ok(removed)
    }

    /// Make `identity` current.
    ///
    /// Switching to the already-current identity is a no-op success and
    /// publishes nothing.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::UnknownIdentity` unless the identity
    /// already exists in the mapping; use
    /// [`switch_to_seeding`](Self::switch_to_seeding) to create it
    /// explicitly.
    pub fn switch_to(&self, identity: &Identity) -> Result<()> {
        let mut state = self.lock_state();

        if state.current == *identity {
            return Ok(());
        }
        if !state.mapping.contains_key(identity) {
            return Err(TrustError::UnknownIdentity(identity.fingerprint()));
        }

        state.current = identity.clone();
        log::debug!("switched current identity to {}", identity.fingerprint());
        self.commit(&mut state);
        Ok(())
    }

    /// Make `identity` current, seeding an empty trust set for it first
    /// if it is not yet known.
    pub fn switch_to_seeding(&self, identity: &Identity) -> Result<()> {
        let mut state = self.lock_state();

        if state.current == *identity {
            return Ok(());
        }

        state.mapping.entry(identity.clone()).or_default();
        state.current = identity.clone();
        log::debug!(
            "switched current identity to {} (seeded)",
            identity.fingerprint()
        );
        self.commit(&mut state);
        Ok(())
    }

    /// Seed an empty trust set for `identity` without switching to it.
    /// Idempotent: seeding a known identity changes and publishes
    /// nothing.
    pub fn seed_identity(&self, identity: &Identity) {
        let mut state = self.lock_state();
        if state.mapping.contains_key(identity) {
            return;
        }
        state.mapping.insert(identity.clone(), Vec::new());
        log::debug!("seeded empty trust set for {}", identity.fingerprint());
        self.commit(&mut state);
    }

    // ── Reads ─────────────────────────────────────────────────────────────────

    /// Copy of `identity`'s trust set in insertion order; empty if the
    /// identity holds no entries or is unknown. Never an error.
    pub fn list_trusted(&self, identity: &Identity) -> Vec<TrustedEntry> {
        self.lock_state()
            .mapping
            .get(identity)
            .cloned()
            .unwrap_or_default()
    }

    /// Immutable copy of the whole mapping at the current version.
    pub fn snapshot(&self) -> TrustSnapshot {
        self.lock_state().snapshot()
    }

    /// The active identity.
    pub fn current(&self) -> Identity {
        self.lock_state().current.clone()
    }

    /// Committed mutation count.
    pub fn version(&self) -> u64 {
        self.lock_state().version
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    /// Register an observer for post-commit snapshots.
    pub fn subscribe(&self) -> (SubscriptionHandle, SnapshotReceiver) {
        self.hub.subscribe()
    }

    /// Remove an observer.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.hub.unsubscribe(handle)
    }

    /// The hub itself, for hosts that manage subscriptions directly.
    pub fn hub(&self) -> &SubscriptionHub {
        &self.hub
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn lock_state(&self) -> std::sync::MutexGuard<'_, StoreState> {
        // Mutation code cannot panic while holding the lock, so a
        // poisoned mutex still guards consistent state.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Bump the version and publish the resulting snapshot while still
    /// holding the state lock, so subscribers see commits in version
    /// order with no gaps.
    fn commit(&self, state: &mut StoreState) {
        state.version += 1;
        self.hub.publish(&state.snapshot());
    }
}
