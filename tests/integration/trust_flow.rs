//! Integration test: full end-to-end trust session.
//!
//! Drives the complete lifecycle through the dispatcher:
//! 1. Add trusted keys for the current identity
//! 2. Refresh a nickname by re-adding the same key
//! 3. Remove a trusted key
//! 4. Switch identities, with and without seeding
//! 5. Observe every committed change through a subscription

use std::sync::Arc;

use trustnet::{
    ActionDispatcher, CurrentIdentitySelector, Identity, Intent, IntentOutcome, TrustError,
    TrustStore, TrustedEntry,
};

fn spawn_session() -> (Arc<TrustStore>, trustnet::DispatcherHandle) {
    let store = Arc::new(TrustStore::new(
        Identity::new("ID1"),
        Box::new(trustnet::AcceptAll),
    ));
    let handle = ActionDispatcher::spawn(Arc::clone(&store));
    (store, handle)
}

#[tokio::test]
async fn trust_session_add_overwrite_remove_switch() {
    let (store, handle) = spawn_session();
    let id1 = Identity::new("ID1");
    let (_sub, mut rx) = store.subscribe();

    // ── Step 1: Add a trusted key ───────────────────────────────────────
    let outcome = handle.add_trusted_key("Alice", "PUB1").await.unwrap();
    assert_eq!(
        outcome,
        IntentOutcome::Added(TrustedEntry::new("Alice", "PUB1"))
    );
    assert_eq!(
        store.list_trusted(&id1),
        vec![TrustedEntry::new("Alice", "PUB1")]
    );

    // ── Step 2: Re-add refreshes the nickname, no duplicate ────────────
    handle.add_trusted_key("Alicia", "PUB1").await.unwrap();
    assert_eq!(
        store.list_trusted(&id1),
        vec![TrustedEntry::new("Alicia", "PUB1")]
    );

    // ── Step 3: Remove empties the set ──────────────────────────────────
    handle
        .remove_trusted_key(id1.clone(), "PUB1")
        .await
        .unwrap();
    assert!(store.list_trusted(&id1).is_empty());

    // ── Step 4: Switching to an unseeded identity must be explicit ─────
    let id2 = Identity::new("ID2");
    let result = handle.switch_identity(id2.clone(), false).await;
    assert!(matches!(result, Err(TrustError::UnknownIdentity(_))));
    assert_eq!(store.current(), id1);

    handle.switch_identity(id2.clone(), true).await.unwrap();
    assert_eq!(store.current(), id2);
    assert!(store.list_trusted(&id2).is_empty());

    // ── Step 5: The subscriber saw all four commits, in order ───────────
    for expected_version in 1..=4 {
        let snap = rx.recv().await.unwrap();
        assert_eq!(snap.version, expected_version);
    }
    assert!(rx.try_recv().is_err(), "failed switch must not publish");
}

#[tokio::test]
async fn selector_view_follows_dispatched_switches() {
    let (store, handle) = spawn_session();
    let selector = CurrentIdentitySelector::new(Arc::clone(&store));

    handle.add_trusted_key("Alice", "PUB1").await.unwrap();
    assert_eq!(selector.trusted_by_current().len(), 1);

    handle
        .switch_identity(Identity::new("ID2"), true)
        .await
        .unwrap();
    assert_eq!(selector.current(), Identity::new("ID2"));
    assert!(selector.trusted_by_current().is_empty());
}

#[tokio::test]
async fn invalid_keys_are_rejected_before_touching_state() {
    let store = Arc::new(TrustStore::new(
        Identity::new("ID1"),
        Box::new(trustnet::Ed25519Validator),
    ));
    let handle = ActionDispatcher::spawn(Arc::clone(&store));

    let result = handle.add_trusted_key("Mallory", "not-a-key").await;
    assert!(matches!(result, Err(TrustError::InvalidKey(_))));
    assert_eq!(store.version(), 0);

    // The store stays usable after the failure.
    use ed25519_dalek::SigningKey;
    let key = base64::Engine::encode(
        &base64::engine::general_purpose::STANDARD,
        SigningKey::generate(&mut rand::rngs::OsRng)
            .verifying_key()
            .to_bytes(),
    );
    handle.add_trusted_key("Peer", key).await.unwrap();
    assert_eq!(store.version(), 1);
}

#[tokio::test]
async fn trusting_a_key_does_not_leak_across_identities() {
    let (store, handle) = spawn_session();
    let id1 = Identity::new("ID1");
    let id2 = Identity::new("ID2");

    handle
        .submit(Intent::switch_identity(id2.clone(), true))
        .await
        .unwrap();
    handle
        .add_trusted_key_for(id1.clone(), "Alice", "SHARED")
        .await
        .unwrap();

    assert!(store.list_trusted(&id2).is_empty());
    assert_eq!(store.list_trusted(&id1).len(), 1);
}

#[tokio::test]
async fn late_subscriber_only_sees_subsequent_commits() {
    let (store, handle) = spawn_session();

    handle.add_trusted_key("Alice", "PUB1").await.unwrap();

    let (_sub, mut rx) = store.subscribe();
    handle.add_trusted_key("Bob", "PUB2").await.unwrap();

    let snap = rx.recv().await.unwrap();
    assert_eq!(snap.version, 2);
    assert!(rx.try_recv().is_err());
}
