//! The trust store and its read-side views.
//!
//! # Modules
//!
//! - [`trust_store`] — authoritative identity → trusted-key mapping.
//! - [`snapshot`] — immutable point-in-time copies of the mapping.
//! - [`selector`] — the current-identity pointer.

pub mod selector;
pub mod snapshot;
pub mod trust_store;

pub use selector::CurrentIdentitySelector;
pub use snapshot::TrustSnapshot;
pub use trust_store::TrustStore;
