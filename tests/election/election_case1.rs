//! Case 1: Leadership hands over from one node to another through an explicit
//! step down.
//!
//! Scenario:
//!
//! 1. Two engines E1 (node-a) and E2 (node-b) contend for `svc/leader` in a
//!    store with no entry.
//! 2. Start E1's loop; after one cycle E1 is leader.
//! 3. Start E2's loop; its acquisitions are rejected while E1's session holds
//!    the key.
//! 4. Cancel E1 and step it down. Stepping down alone does not stop E1's
//!    loop, which polls before E2 and would take the key back; the cancel
//!    makes this a clean hand-off.
//!
//! Expected Result:
//!
//! - E1 reports not leader right after stepping down.
//! - After E2's next cycle, E2 is leader.

use std::sync::Arc;
use std::time::Duration;

use d_election::LeaderElection;
use d_election::MemLockStore;
use tokio::time::sleep;
use tracing_test::traced_test;

const KEY: &str = "svc/leader";

#[tokio::test(start_paused = true)]
#[traced_test]
async fn test_leadership_hands_over_after_step_down() {
    let store = MemLockStore::new();
    let e1 = Arc::new(LeaderElection::new(
        KEY,
        Duration::from_secs(1),
        Arc::new(store.client("node-a")),
    ));
    let e2 = Arc::new(LeaderElection::new(
        KEY,
        Duration::from_secs(1),
        Arc::new(store.client("node-b")),
    ));

    let h1 = e1.spawn();
    sleep(Duration::from_millis(10)).await;
    assert!(e1.is_leader().await);

    let h2 = e2.spawn();
    sleep(Duration::from_millis(10)).await;
    assert!(!e2.is_leader().await);
    assert_eq!(e2.current_leader().await.unwrap().value, "node-a");

    e1.cancel();
    assert!(e1.step_down().await.is_ok());
    assert!(!e1.is_leader().await);

    // E2 polls again at t=1.01s
    sleep(Duration::from_secs(1)).await;
    assert!(e2.is_leader().await);
    assert!(!e1.is_leader().await);
    assert_eq!(e1.current_leader().await.unwrap().value, "node-b");

    h1.await.unwrap();
    e2.shutdown(h2).await.unwrap();
}
