use super::*;

#[test]
fn test_acquire_counter_increment() {
    // Label by a key no other test uses
    let key = "metrics_test/acquire";
    record_acquire(key, OUTCOME_ACQUIRED);
    record_acquire(key, OUTCOME_ACQUIRED);
    record_acquire(key, OUTCOME_REJECTED);

    assert_eq!(
        ELECTION_ACQUIRE_ATTEMPTS
            .with_label_values(&[key, OUTCOME_ACQUIRED])
            .get(),
        2
    );
    assert_eq!(
        ELECTION_ACQUIRE_ATTEMPTS
            .with_label_values(&[key, OUTCOME_REJECTED])
            .get(),
        1
    );
}

#[test]
fn test_gather_metrics_contains_election_families() {
    let key = "metrics_test/gather";
    record_acquire(key, OUTCOME_ERROR);
    record_step_down(key, OUTCOME_NOOP);

    let text = gather_metrics();
    assert!(text.contains("election_acquire_attempts"), "Missing election_acquire_attempts");
    assert!(text.contains("election_step_down_total"), "Missing election_step_down_total");
    assert!(text.contains(key));
}
