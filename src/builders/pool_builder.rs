//! Builders to construct resource pools from configuration.

use std::collections::HashMap;

use crate::config::{CoordinationConfig, PoolConfig};
use crate::core::{AppResult, ConfigError, PoolError, Resource, ResourcePool};

/// Build named resource pools from configuration.
///
/// `factory_for` is called once per configured pool and returns the factory
/// that pool will use to create resources.
///
/// # Errors
///
/// Returns `ConfigError::Invalid` if the configuration fails validation or a
/// pool cannot be constructed.
pub fn build_pools<R, F, FF>(
    cfg: &CoordinationConfig,
    mut factory_for: FF,
) -> Result<HashMap<String, ResourcePool<R, F>>, ConfigError>
where
    R: Resource,
    F: Fn() -> AppResult<R>,
    FF: FnMut(&str, &PoolConfig) -> F,
{
    cfg.validate()?;

    let mut pools = HashMap::with_capacity(cfg.pools.len());
    for (name, pool_cfg) in &cfg.pools {
        let pool = ResourcePool::new(factory_for(name, pool_cfg), pool_cfg.capacity)
            .map_err(|e: PoolError| ConfigError::Invalid(format!("pool `{name}`: {e}")))?;
        tracing::debug!(pool = %name, capacity = pool_cfg.capacity, "Built resource pool");
        pools.insert(name.clone(), pool);
    }

    Ok(pools)
}
