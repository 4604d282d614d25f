//! The single-consumer intent loop.
//!
//! Producers hold cloneable [`DispatcherHandle`]s; exactly one
//! [`ActionDispatcher`] drains the queue and applies intents to the
//! store one at a time. Applying is synchronous and bounded by the
//! store's own per-intent cost, so one caller's intent never blocks
//! the queue longer than that.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::error::{Result, TrustError};
use crate::identity::Identity;
use crate::store::TrustStore;

use super::intent::{Intent, IntentOutcome};

/// Default bound for the intent queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// An intent together with the channel its outcome is reported on.
struct IntentEnvelope {
    intent: Intent,
    reply: oneshot::Sender<Result<IntentOutcome>>,
}

/// Producer-side handle. Cheap to clone; all clones feed the same
/// ordered queue.
#[derive(Clone)]
pub struct DispatcherHandle {
    tx: mpsc::Sender<IntentEnvelope>,
}

/// Outcome of an intent enqueued without waiting.
pub struct PendingOutcome {
    rx: oneshot::Receiver<Result<IntentOutcome>>,
}

impl PendingOutcome {
    /// Wait for the intent to be applied and return its outcome.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::DispatcherClosed` if the consumer loop shut
    /// down before applying the intent.
    pub async fn outcome(self) -> Result<IntentOutcome> {
        self.rx.await.map_err(|_| TrustError::DispatcherClosed)?
    }
}

impl DispatcherHandle {
    /// Submit an intent and wait for its outcome.
    ///
    /// The returned error is either the store's verdict on the intent
    /// or `TrustError::DispatcherClosed` if the loop is gone.
    pub async fn submit(&self, intent: Intent) -> Result<IntentOutcome> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(IntentEnvelope { intent, reply })
            .await
            .map_err(|_| TrustError::DispatcherClosed)?;
        rx.await.map_err(|_| TrustError::DispatcherClosed)?
    }

    /// Enqueue an intent without waiting, for producers that must not
    /// block (UI event handlers).
    ///
    /// # Errors
    ///
    /// Returns `TrustError::QueueFull` when the queue is at capacity,
    /// or `TrustError::DispatcherClosed` if the loop is gone.
    pub fn try_submit(&self, intent: Intent) -> Result<PendingOutcome> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .try_send(IntentEnvelope { intent, reply })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => TrustError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => TrustError::DispatcherClosed,
            })?;
        Ok(PendingOutcome { rx })
    }

    // ── Intent shorthands ─────────────────────────────────────────────────────

    /// Trust `public_key` under the identity current at application time.
    pub async fn add_trusted_key(
        &self,
        name: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Result<IntentOutcome> {
        self.submit(Intent::add_trusted_key(name, public_key)).await
    }

    /// Trust `public_key` under an explicit identity.
    pub async fn add_trusted_key_for(
        &self,
        identity: Identity,
        name: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Result<IntentOutcome> {
        self.submit(Intent::AddTrustedKey {
            identity: Some(identity),
            name: name.into(),
            public_key: public_key.into(),
        })
        .await
    }

    /// Drop `public_key` from `identity`'s trust set.
    pub async fn remove_trusted_key(
        &self,
        identity: Identity,
        public_key: impl Into<String>,
    ) -> Result<IntentOutcome> {
        self.submit(Intent::remove_trusted_key(identity, public_key))
            .await
    }

    /// Switch the current identity; `seed` creates it if new.
    pub async fn switch_identity(
        &self,
        identity: Identity,
        seed: bool,
    ) -> Result<IntentOutcome> {
        self.submit(Intent::switch_identity(identity, seed)).await
    }
}

/// The consumer half: owns the queue's receiving end and the order of
/// application.
pub struct ActionDispatcher {
    store: Arc<TrustStore>,
    rx: mpsc::Receiver<IntentEnvelope>,
}

impl ActionDispatcher {
    /// Create a dispatcher over `store` with a bounded queue.
    ///
    /// The returned dispatcher must be driven with [`run`](Self::run);
    /// [`spawn`](Self::spawn) does both in one call.
    pub fn new(store: Arc<TrustStore>, capacity: usize) -> (DispatcherHandle, ActionDispatcher) {
        let (tx, rx) = mpsc::channel(capacity);
        (DispatcherHandle { tx }, ActionDispatcher { store, rx })
    }

    /// Create a dispatcher with the default queue capacity and run its
    /// loop on a spawned task.
    pub fn spawn(store: Arc<TrustStore>) -> DispatcherHandle {
        let (handle, dispatcher) = Self::new(store, DEFAULT_QUEUE_CAPACITY);
        tokio::spawn(dispatcher.run());
        handle
    }

    /// Drain the queue until every handle is dropped, applying intents
    /// strictly in arrival order.
    pub async fn run(mut self) {
        while let Some(IntentEnvelope { intent, reply }) = self.rx.recv().await {
            let outcome = self.apply(intent);
            if let Err(ref e) = outcome {
                log::debug!("intent rejected: {e}");
            }
            // The producer may have stopped waiting; that is its
            // prerogative and must not abort the loop.
            if reply.send(outcome).is_err() {
                log::debug!("intent outcome dropped: caller went away");
            }
        }
        log::debug!("intent queue closed, dispatcher stopping");
    }

    /// Apply one intent to the store.
    fn apply(&self, intent: Intent) -> Result<IntentOutcome> {
        match intent {
            Intent::AddTrustedKey {
                identity,
                name,
                public_key,
            } => self
                .store
                .add_trusted_key(identity.as_ref(), &name, &public_key)
                .map(IntentOutcome::Added),
            Intent::RemoveTrustedKey {
                identity,
                public_key,
            } => self
                .store
                .remove_trusted_key(&identity, &public_key)
                .map(IntentOutcome::Removed),
            Intent::SwitchIdentity { identity, seed } => {
                if seed {
                    self.store.switch_to_seeding(&identity)?;
                } else {
                    self.store.switch_to(&identity)?;
                }
                Ok(IntentOutcome::Switched(identity))
            }
        }
    }
}
