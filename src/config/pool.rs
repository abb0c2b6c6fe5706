//! Pool and runner configuration structures.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::ConfigError;

/// Environment variable holding the runner deadline in seconds.
pub const ENV_RUNNER_TIMEOUT_SECS: &str = "RUNNER_TIMEOUT_SECS";
/// Environment variable toggling OS interrupt handling (`true`/`false`).
pub const ENV_RUNNER_HANDLE_INTERRUPT: &str = "RUNNER_HANDLE_INTERRUPT";

/// Resource pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum idle resources retained.
    pub capacity: usize,
}

/// Task runner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Deadline in seconds, measured from runner construction.
    pub timeout_secs: u64,
    /// Subscribe to the process interrupt signal on start.
    #[serde(default = "default_handle_os_interrupt")]
    pub handle_os_interrupt: bool,
}

/// Root configuration: named pools plus an optional runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinationConfig {
    /// Map of pool name to configuration.
    #[serde(default)]
    pub pools: HashMap<String, PoolConfig>,
    /// Runner configuration, if a runner is used.
    #[serde(default)]
    pub runner: Option<RunnerConfig>,
}

const fn default_handle_os_interrupt() -> bool {
    true
}

impl PoolConfig {
    /// Validate pool configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `capacity` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid("capacity must be greater than 0".into()));
        }
        Ok(())
    }
}

impl RunnerConfig {
    /// Validate runner configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `timeout_secs` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }

    /// Deadline as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load runner configuration from the environment, reading `.env` first.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a variable is missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine; real environment variables still apply.
        let _ = dotenvy::dotenv();

        let timeout_secs = std::env::var(ENV_RUNNER_TIMEOUT_SECS)
            .map_err(|e| ConfigError::Invalid(format!("{ENV_RUNNER_TIMEOUT_SECS}: {e}")))?
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::Invalid(format!("{ENV_RUNNER_TIMEOUT_SECS}: {e}")))?;

        let handle_os_interrupt = match std::env::var(ENV_RUNNER_HANDLE_INTERRUPT) {
            Ok(raw) => raw.trim().parse::<bool>().map_err(|e| {
                ConfigError::Invalid(format!("{ENV_RUNNER_HANDLE_INTERRUPT}: {e}"))
            })?,
            Err(_) => default_handle_os_interrupt(),
        };

        let cfg = Self {
            timeout_secs,
            handle_os_interrupt,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

impl CoordinationConfig {
    /// Validate every pool and the runner, if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first invalid section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pools.is_empty() && self.runner.is_none() {
            return Err(ConfigError::Invalid(
                "at least one pool or a runner must be defined".into(),
            ));
        }
        for (name, pool) in &self.pools {
            pool.validate()
                .map_err(|e| ConfigError::Invalid(format!("pool `{name}`: {e}")))?;
        }
        if let Some(runner) = &self.runner {
            runner
                .validate()
                .map_err(|e| ConfigError::Invalid(format!("runner: {e}")))?;
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` on malformed JSON and
    /// `ConfigError::Invalid` on failed validation.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(input)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
