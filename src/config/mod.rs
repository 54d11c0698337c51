//! Configuration management for leader election nodes.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Configuration file support
//! - Environment variable overrides
mod election;
pub use election::*;


use std::env;
use std::fmt::Debug;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::CONFIG_ENV_PREFIX;
use crate::constants::CONFIG_PATH_ENV;
use crate::Result;

/// Top level configuration container
///
/// Sources are merged in the following order (later sources override earlier):
/// 1. Type defaults (lowest priority)
/// 2. Configuration file from `CONFIG_PATH` environment variable (if set)
/// 3. Environment variables with `D_ELECTION__` prefix (highest priority)
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct ElectionNodeConfig {
    /// Election parameters
    #[serde(default)]
    pub election: ElectionConfig,
}

impl Debug for ElectionNodeConfig {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ElectionNodeConfig")
            .field("leader_key", &self.election.leader_key)
            .finish()
    }
}

impl ElectionNodeConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// # Note
    /// Validation is deferred so further overrides can be applied through
    /// `with_override_config()`. Callers must call `validate()` before use.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("CONFIG_PATH", "config/election.toml");
    /// std::env::set_var("D_ELECTION__ELECTION__POLL_INTERVAL_MS", "2000");
    /// let cfg = ElectionNodeConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(environment_source());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional configuration overrides from file without validation.
    ///
    /// Merging order (later sources override earlier):
    /// 1. Current configuration values
    /// 2. New configuration file
    /// 3. Latest environment variables (highest priority)
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(environment_source())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates configuration and returns the validated instance.
    pub fn validate(self) -> Result<Self> {
        self.election.validate()?;
        Ok(self)
    }
}

fn environment_source() -> Environment {
    Environment::with_prefix(CONFIG_ENV_PREFIX)
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}
