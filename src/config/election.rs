use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_LEADER_KEY;
use crate::constants::DEFAULT_MIN_POLL_INTERVAL_MS;
use crate::constants::DEFAULT_POLL_INTERVAL_MS;
use crate::Error;
use crate::Result;

/// Parameters of a single election
///
/// One engine instance governs exactly one key, so one `ElectionConfig`
/// describes one contended resource.
///
/// ```toml
/// [election]
/// leader_key = "service/leader-election/leader"
/// poll_interval_ms = 2000
/// min_poll_interval_ms = 1000
/// ```
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ElectionConfig {
    /// Key contended in the lock service. Also used as the session name.
    #[serde(default = "default_leader_key")]
    pub leader_key: String,

    /// Delay between two poll cycles (milliseconds)
    ///
    /// Values below `min_poll_interval_ms` are raised to the floor when the
    /// engine is built; they are not rejected.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Floor applied to `poll_interval_ms` (milliseconds)
    #[serde(default = "default_min_poll_interval_ms")]
    pub min_poll_interval_ms: u64,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            leader_key: default_leader_key(),
            poll_interval_ms: default_poll_interval_ms(),
            min_poll_interval_ms: default_min_poll_interval_ms(),
        }
    }
}

impl ElectionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.leader_key.trim().is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "leader_key cannot be empty".into(),
            )));
        }

        if self.min_poll_interval_ms == 0 {
            return Err(Error::Config(ConfigError::Message(
                "min_poll_interval_ms must be greater than 0".into(),
            )));
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn min_poll_interval(&self) -> Duration {
        Duration::from_millis(self.min_poll_interval_ms)
    }
}

fn default_leader_key() -> String {
    DEFAULT_LEADER_KEY.to_string()
}
fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}
fn default_min_poll_interval_ms() -> u64 {
    DEFAULT_MIN_POLL_INTERVAL_MS
}
