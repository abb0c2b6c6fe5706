//! Resource pooling and deadline-bounded task execution.

pub mod error;
pub mod resource_pool;
pub mod runner;

pub use error::{AppResult, ConfigError, PoolError, RunnerError};
pub use resource_pool::{PoolStats, Resource, ResourcePool};
pub use runner::{InterruptHandle, Runner, RunnerState, Task};
