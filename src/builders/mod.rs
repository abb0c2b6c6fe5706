//! Builders to construct pools and runners from configuration.

pub mod pool_builder;

pub use pool_builder::build_pools;
