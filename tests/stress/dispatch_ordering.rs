//! Stress test: intent ordering under many concurrent producers.
//!
//! All mutations funnel through the dispatcher's single queue, so a
//! producer's own intents apply in submission order and no update is
//! ever lost, however many producers race.

use std::sync::Arc;

use trustnet::{AcceptAll, ActionDispatcher, Identity, IntentOutcome, TrustStore};

fn spawn_session() -> (Arc<TrustStore>, trustnet::DispatcherHandle) {
    let store = Arc::new(TrustStore::new(Identity::new("ID1"), Box::new(AcceptAll)));
    let handle = ActionDispatcher::spawn(Arc::clone(&store));
    (store, handle)
}

#[tokio::test]
async fn stress_20_producers_lose_no_updates() {
    let (store, handle) = spawn_session();

    let mut tasks = Vec::new();
    for producer in 0..20 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            for i in 0..50 {
                handle
                    .add_trusted_key(
                        format!("peer-{producer}-{i}"),
                        format!("PUB-{producer}-{i}"),
                    )
                    .await
                    .expect("add should succeed");
            }
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }

    assert_eq!(store.list_trusted(&Identity::new("ID1")).len(), 1_000);
    assert_eq!(store.version(), 1_000);
}

#[tokio::test]
async fn stress_per_producer_order_is_preserved() {
    let (store, handle) = spawn_session();

    // Each producer re-adds its own key with an increasing sequence
    // number as the nickname. Since one producer's submissions are
    // ordered, the surviving name must be its final one.
    let mut tasks = Vec::new();
    for producer in 0..10 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            for seq in 0..100 {
                handle
                    .add_trusted_key(format!("seq-{seq}"), format!("PUB-{producer}"))
                    .await
                    .expect("add should succeed");
            }
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }

    let listed = store.list_trusted(&Identity::new("ID1"));
    assert_eq!(listed.len(), 10);
    for entry in listed {
        assert_eq!(entry.name, "seq-99", "later intents must win");
    }
}

#[tokio::test]
async fn stress_earlier_effects_visible_in_later_snapshots() {
    let (store, handle) = spawn_session();
    let (_sub, mut rx) = store.subscribe();

    // Submit A strictly before B from the same producer.
    handle.add_trusted_key("A", "PUB-A").await.unwrap();
    handle.add_trusted_key("B", "PUB-B").await.unwrap();

    let mut saw_b = false;
    while let Ok(snap) = rx.try_recv() {
        if snap.contains(&Identity::new("ID1"), "PUB-B") {
            saw_b = true;
        }
        // In every snapshot where B's effect is visible, A's must be too.
        if saw_b {
            assert!(snap.contains(&Identity::new("ID1"), "PUB-A"));
        }
    }
    assert!(saw_b);
}

#[tokio::test]
async fn stress_mixed_intents_with_failures_keep_the_loop_alive() {
    let (store, handle) = spawn_session();

    let mut tasks = Vec::new();
    for producer in 0..10 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            let mut applied = 0u64;
            for i in 0..50 {
                let key = format!("PUB-{producer}-{i}");
                handle
                    .add_trusted_key("peer", key.clone())
                    .await
                    .expect("add should succeed");
                applied += 1;

                // Half the removes target a key that never existed.
                let target = if i % 2 == 0 {
                    key
                } else {
                    format!("MISSING-{producer}-{i}")
                };
                match handle
                    .remove_trusted_key(Identity::new("ID1"), target)
                    .await
                {
                    Ok(IntentOutcome::Removed(_)) => applied += 1,
                    Ok(other) => panic!("unexpected outcome {other:?}"),
                    Err(trustnet::TrustError::NotFound(_)) => {}
                    Err(e) => panic!("unexpected error {e}"),
                }
            }
            applied
        }));
    }

    let mut total_applied = 0;
    for t in tasks {
        total_applied += t.await.unwrap();
    }

    // Versions count only committed mutations, failed removes excluded.
    assert_eq!(store.version(), total_applied);
    assert_eq!(store.list_trusted(&Identity::new("ID1")).len(), 250);
}
