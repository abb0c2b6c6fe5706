//! Error types for pool and runner operations.

use thiserror::Error;

/// Errors produced by [`ResourcePool`](crate::core::ResourcePool).
#[derive(Debug, Error)]
pub enum PoolError {
    /// Pool was constructed with a capacity of zero.
    #[error("invalid capacity: {0} (must be greater than 0)")]
    InvalidCapacity(usize),
    /// The idle buffer has been closed and drained.
    #[error("pool has been closed")]
    Closed,
    /// The resource factory failed; the error is passed through unchanged.
    #[error(transparent)]
    Factory(anyhow::Error),
}

/// Errors produced by [`Runner`](crate::core::Runner).
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The deadline elapsed before the task sequence completed.
    #[error("received timeout")]
    Timeout,
    /// An interrupt was observed between tasks.
    #[error("received interrupt")]
    Interrupt,
    /// `start` was called on a runner that already left the idle state.
    #[error("runner already started")]
    AlreadyStarted,
    /// The executor thread terminated without reporting a result.
    #[error("task panicked on the executor thread")]
    TaskPanicked,
    /// The executor thread could not be spawned.
    #[error("failed to spawn executor thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Errors produced while validating or loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),
    /// The configuration document could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Application-facing result using anyhow for collaborator closures.
pub type AppResult<T> = Result<T, anyhow::Error>;
