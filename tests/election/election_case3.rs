//! Case 3: Several nodes contend for one key built from configuration.
//!
//! Expected Result:
//!
//! - Exactly one node leads at every observation point.
//! - After the leader cancels and steps down, exactly one of the remaining
//!   nodes takes over.

use std::sync::Arc;
use std::time::Duration;

use d_election::ElectionConfig;
use d_election::LeaderElection;
use d_election::MemLockClient;
use d_election::MemLockStore;
use tokio::time::sleep;
use tracing_test::traced_test;

async fn leader_indexes(elections: &[Arc<LeaderElection<MemLockClient>>]) -> Vec<usize> {
    let mut leaders = Vec::new();
    for (i, e) in elections.iter().enumerate() {
        if e.is_leader().await {
            leaders.push(i);
        }
    }
    leaders
}

#[tokio::test(start_paused = true)]
#[traced_test]
async fn test_single_leader_among_contenders() {
    let config = ElectionConfig {
        leader_key: "jobs/scheduler".to_string(),
        poll_interval_ms: 200, // raised to the 1s floor
        min_poll_interval_ms: 1000,
    };
    let store = MemLockStore::new();
    let elections: Vec<_> = (0..5)
        .map(|i| {
            Arc::new(LeaderElection::from_config(
                &config,
                Arc::new(store.client(format!("node-{i}"))),
            ))
        })
        .collect();
    let handles: Vec<_> = elections.iter().map(|e| e.spawn()).collect();

    for _ in 0..5 {
        sleep(Duration::from_millis(700)).await;
        assert_eq!(leader_indexes(&elections).await.len(), 1);
    }

    let old = leader_indexes(&elections).await[0];
    elections[old].cancel();
    elections[old].step_down().await.unwrap();
    assert!(leader_indexes(&elections).await.is_empty());

    sleep(Duration::from_millis(1100)).await;
    let leaders = leader_indexes(&elections).await;
    assert_eq!(leaders.len(), 1);
    assert_ne!(leaders[0], old);

    for (e, h) in elections.iter().zip(handles) {
        e.shutdown(h).await.unwrap();
    }
}
