//! Case 2: A dead leader's session expires and a follower takes over.
//!
//! Scenario:
//!
//! 1. node-a becomes leader, node-b follows.
//! 2. node-a stops polling without stepping down (process crash).
//! 3. The lock service invalidates node-a's sessions.
//!
//! Expected Result:
//!
//! - While node-a's session lives, node-b never becomes leader even though
//!   node-a has stopped polling.
//! - Once the session is gone node-b acquires the key on its next cycle.
//! - node-a's stale value does not make it leader again.

use std::sync::Arc;
use std::time::Duration;

use d_election::LeaderElection;
use d_election::MemLockStore;
use tokio::time::sleep;
use tracing_test::traced_test;

const KEY: &str = "svc/leader";

#[tokio::test(start_paused = true)]
#[traced_test]
async fn test_follower_takes_over_after_session_expiry() {
    let store = MemLockStore::new();
    let a = Arc::new(LeaderElection::new(
        KEY,
        Duration::from_secs(1),
        Arc::new(store.client("node-a")),
    ));
    let b = Arc::new(LeaderElection::new(
        KEY,
        Duration::from_secs(2),
        Arc::new(store.client("node-b")),
    ));

    let ha = a.spawn();
    sleep(Duration::from_millis(10)).await;
    let hb = b.spawn();
    sleep(Duration::from_millis(10)).await;
    assert!(a.is_leader().await);
    assert!(!b.is_leader().await);

    a.shutdown(ha).await.unwrap();
    sleep(Duration::from_secs(5)).await;
    assert!(!b.is_leader().await);
    assert!(a.is_leader().await);

    assert_eq!(store.invalidate_node_sessions("node-a"), 1);
    assert!(!a.is_leader().await);

    sleep(Duration::from_secs(2)).await;
    assert!(b.is_leader().await);
    assert!(!a.is_leader().await);

    b.shutdown(hb).await.unwrap();
}
