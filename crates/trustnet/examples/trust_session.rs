//! Trust session — drive the store through the dispatcher and watch
//! snapshots arrive.
//!
//! Run with:
//!   cargo run --example trust_session -p trustnet

use std::sync::Arc;

use trustnet::{
    AcceptAll, ActionDispatcher, CurrentIdentitySelector, Identity, TrustStore,
};

#[tokio::main]
async fn main() {
    // ── 1. Create the store and its dispatcher ──────────────────────────────
    //
    // The store owns the identity → trusted-keys mapping; the dispatcher
    // serializes every mutation through one queue so producers can race
    // freely.
    let current = Identity::new("MY-PUBLIC-KEY");
    let store = Arc::new(TrustStore::new(current.clone(), Box::new(AcceptAll)));
    let handle = ActionDispatcher::spawn(Arc::clone(&store));
    println!("Store created for {}", current.fingerprint());
    println!();

    // ── 2. Subscribe before mutating ────────────────────────────────────────
    //
    // A subscriber registered now sees every snapshot committed from
    // here on, in order, exactly once.
    let (_subscription, mut snapshots) = store.subscribe();

    // ── 3. Trust some keys ──────────────────────────────────────────────────
    handle.add_trusted_key("Alice", "PUB1").await.unwrap();
    handle.add_trusted_key("Bob", "PUB2").await.unwrap();

    // Re-adding the same key refreshes the nickname without duplicating.
    handle.add_trusted_key("Alicia", "PUB1").await.unwrap();

    println!("Trusted by {}:", current.fingerprint());
    for entry in store.list_trusted(&current) {
        println!("  {:10} {}", entry.name, entry.public_key);
    }
    println!();

    // ── 4. Remove a key ─────────────────────────────────────────────────────
    handle
        .remove_trusted_key(current.clone(), "PUB2")
        .await
        .unwrap();
    println!("After removing PUB2: {} entries", store.list_trusted(&current).len());
    println!();

    // ── 5. Switch identity ──────────────────────────────────────────────────
    //
    // Unknown identities must be seeded explicitly; the selector offers
    // both paths.
    let selector = CurrentIdentitySelector::new(Arc::clone(&store));
    let other = Identity::new("OTHER-PUBLIC-KEY");
    assert!(selector.switch_to(&other).is_err());
    selector.switch_to_seeding(&other).unwrap();
    println!("Current identity is now {}", selector.current().fingerprint());
    println!(
        "It trusts {} keys (fresh identities start empty)",
        selector.trusted_by_current().len()
    );
    println!();

    // ── 6. Replay what the subscriber saw ───────────────────────────────────
    println!("Snapshots observed:");
    while let Ok(snap) = snapshots.try_recv() {
        println!(
            "  v{}: current={}, identities={}",
            snap.version,
            snap.current.fingerprint(),
            snap.mapping.len()
        );
    }
}
