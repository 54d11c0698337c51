use lazy_static::lazy_static;
use prometheus::core::Collector;
use prometheus::Encoder;
use prometheus::IntCounterVec;
use prometheus::Opts;
use prometheus::Registry;
use tracing::error;

#[cfg(test)]
mod metrics_test;

pub(crate) const OUTCOME_ACQUIRED: &str = "acquired";
pub(crate) const OUTCOME_REJECTED: &str = "rejected";
pub(crate) const OUTCOME_RELEASED: &str = "released";
pub(crate) const OUTCOME_NOOP: &str = "noop";
pub(crate) const OUTCOME_ERROR: &str = "error";

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref ELECTION_ACQUIRE_ATTEMPTS: IntCounterVec = register(
        IntCounterVec::new(
            Opts::new("election_acquire_attempts", "Acquisition attempts by outcome"),
            &["key", "outcome"]
        )
        .expect("metric can not be created")
    );

    pub static ref ELECTION_STEP_DOWN_TOTAL: IntCounterVec = register(
        IntCounterVec::new(
            Opts::new("election_step_down_total", "Step down calls by outcome"),
            &["key", "outcome"]
        )
        .expect("metric can not be created")
    );
}

fn register<C>(collector: C) -> C
where
    C: Collector + Clone + 'static,
{
    REGISTRY
        .register(Box::new(collector.clone()))
        .expect("collector can be registered");
    collector
}

pub(crate) fn record_acquire(
    key: &str,
    outcome: &str,
) {
    ELECTION_ACQUIRE_ATTEMPTS.with_label_values(&[key, outcome]).inc();
}

pub(crate) fn record_step_down(
    key: &str,
    outcome: &str,
) {
    ELECTION_STEP_DOWN_TOTAL.with_label_values(&[key, outcome]).inc();
}

/// Renders the election metrics in the prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = prometheus::TextEncoder::new();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        error!("could not encode election metrics: {}", e);
        return String::default();
    }
    match String::from_utf8(buffer) {
        Ok(v) => v,
        Err(e) => {
            error!("election metrics could not be from_utf8'd: {}", e);
            String::default()
        }
    }
}
