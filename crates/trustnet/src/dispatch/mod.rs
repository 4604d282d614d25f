//! Intent serialization.
//!
//! Producers (UI, sync jobs, scripts) describe what they want as an
//! [`Intent`] and submit it through a [`DispatcherHandle`]; a single
//! consumer loop applies intents to the store strictly in arrival
//! order, so concurrent producers can never interleave or lose
//! updates.

pub mod dispatcher;
pub mod intent;

pub use dispatcher::{ActionDispatcher, DispatcherHandle, PendingOutcome};
pub use intent::{Intent, IntentOutcome};
