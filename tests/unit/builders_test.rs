//! Tests for builder modules

use prometheus_pool_runner::builders::build_pools;
use prometheus_pool_runner::config::{CoordinationConfig, PoolConfig};
use prometheus_pool_runner::core::{AppResult, Resource};
use std::collections::HashMap;

struct Handle {
    pool: String,
}

impl Resource for Handle {
    fn close(self) -> AppResult<()> {
        Ok(())
    }
}

#[test]
fn test_build_pools_from_config() {
    let mut pools = HashMap::new();
    pools.insert("db".to_string(), PoolConfig { capacity: 2 });
    pools.insert("cache".to_string(), PoolConfig { capacity: 5 });
    let cfg = CoordinationConfig { pools, runner: None };

    let built = build_pools(&cfg, |name, _| {
        let name = name.to_string();
        move || -> AppResult<Handle> { Ok(Handle { pool: name.clone() }) }
    })
    .unwrap();

    assert_eq!(built.len(), 2);
    assert_eq!(built["db"].capacity(), 2);
    assert_eq!(built["cache"].capacity(), 5);

    let handle = built["db"].acquire().unwrap();
    assert_eq!(handle.pool, "db");
}

#[test]
fn test_build_pools_rejects_invalid_config() {
    let mut pools = HashMap::new();
    pools.insert("db".to_string(), PoolConfig { capacity: 0 });
    let cfg = CoordinationConfig { pools, runner: None };

    let result = build_pools(&cfg, |_, _| || -> AppResult<Handle> {
        Ok(Handle {
            pool: String::new(),
        })
    });
    assert!(result.is_err());
}
