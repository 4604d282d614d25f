//! Trustnet — a concurrent trust store for cryptographic identities.
//!
//! Maintains the mapping from a current identity to the set of public
//! keys it trusts, serializes all mutations through a single intent
//! queue, and publishes immutable snapshots to subscribers after every
//! committed change.

pub mod dispatch;
pub mod error;
pub mod hub;
pub mod identity;
pub mod storage;
pub mod store;
pub mod validator;

// Re-export primary types
pub use dispatch::{ActionDispatcher, DispatcherHandle, Intent, IntentOutcome, PendingOutcome};
pub use error::{Result, TrustError};
pub use hub::{SnapshotReceiver, SubscriptionHandle, SubscriptionHub};
pub use identity::{Identity, TrustedEntry};
pub use store::{CurrentIdentitySelector, TrustSnapshot, TrustStore};
pub use validator::{AcceptAll, Ed25519Validator, KeyValidator};
