//! Snapshot pub/sub for store observers.
//!
//! Observers register with [`SubscriptionHub::subscribe`] and receive
//! every snapshot published after their registration, in commit order,
//! exactly once. Delivery is non-blocking: a slow or vanished observer
//! never stalls the mutation path or delivery to other observers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tokio::sync::mpsc;

use crate::store::TrustSnapshot;

/// Receiving half handed to a subscriber. Unbounded so that publishing
/// can never block on a slow consumer.
pub type SnapshotReceiver = mpsc::UnboundedReceiver<TrustSnapshot>;

/// Opaque handle identifying one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

/// Fan-out point for committed state changes.
///
/// The store calls [`publish`](Self::publish) under its own mutation
/// lock, which is what guarantees subscribers see snapshots in commit
/// order with no gaps once registered.
#[derive(Debug, Default)]
pub struct SubscriptionHub {
    subscribers: Mutex<HashMap<u64, mpsc::UnboundedSender<TrustSnapshot>>>,
    next_id: AtomicU64,
}

impl SubscriptionHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new observer.
    ///
    /// The observer receives every snapshot published after this call
    /// returns. A snapshot whose delivery is already in flight when the
    /// subscription is created is not replayed.
    pub fn subscribe(&self) -> (SubscriptionHandle, SnapshotReceiver) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock_subscribers().insert(id, tx);
        (SubscriptionHandle(id), rx)
    }

    /// Remove a subscription. Returns `false` if the handle was already
    /// gone. Safe to call while a publish is in progress; the observer
    /// receives nothing published after removal.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.lock_subscribers().remove(&handle.0).is_some()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.lock_subscribers().len()
    }

    /// Deliver a snapshot to every current subscriber.
    ///
    /// Subscribers whose receiver has been dropped are pruned here;
    /// their failure is logged and does not affect delivery to the rest.
    pub(crate) fn publish(&self, snapshot: &TrustSnapshot) {
        let mut subscribers = self.lock_subscribers();

        subscribers.retain(|id, tx| {
            if tx.send(snapshot.clone()).is_err() {
                log::warn!("dropping subscriber {id}: receiver gone");
                false
            } else {
                true
            }
        });
    }

    /// A poisoned table only means a panicking publisher; the map
    /// itself is still consistent, so recover it.
    fn lock_subscribers(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<u64, mpsc::UnboundedSender<TrustSnapshot>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
