//! Configuration models for pools and runners.

pub mod pool;

pub use pool::{CoordinationConfig, PoolConfig, RunnerConfig};
