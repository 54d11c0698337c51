use std::time::Duration;

// -
// Election timing

/// Lower bound for the election poll interval. Shorter intervals are raised
/// to this value.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub(crate) const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub(crate) const DEFAULT_MIN_POLL_INTERVAL_MS: u64 = 1000;

// -
// Key namespaces

pub const DEFAULT_LEADER_KEY: &str = "service/leader-election/leader";

// -
// Configuration sources

pub(crate) const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
pub(crate) const CONFIG_ENV_PREFIX: &str = "D_ELECTION";
