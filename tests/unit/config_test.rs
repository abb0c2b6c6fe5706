//! Tests for configuration validation

use prometheus_pool_runner::config::{CoordinationConfig, PoolConfig, RunnerConfig};
use prometheus_pool_runner::core::ConfigError;
use prometheus_pool_runner::config::pool::{ENV_RUNNER_HANDLE_INTERRUPT, ENV_RUNNER_TIMEOUT_SECS};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Serializes tests that touch process environment variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with the runner variables set (or removed when `None`), then clear them.
fn with_runner_env<T>(timeout: Option<&str>, handle: Option<&str>, f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    for (key, value) in [(ENV_RUNNER_TIMEOUT_SECS, timeout), (ENV_RUNNER_HANDLE_INTERRUPT, handle)] {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
    let result = f();
    std::env::remove_var(ENV_RUNNER_TIMEOUT_SECS);
    std::env::remove_var(ENV_RUNNER_HANDLE_INTERRUPT);
    result
}

#[test]
fn test_pool_config_validation() {
    let valid = PoolConfig { capacity: 2 };
    assert!(valid.validate().is_ok());
}

#[test]
fn test_pool_config_invalid_capacity() {
    let invalid = PoolConfig { capacity: 0 };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_runner_config_validation() {
    let valid = RunnerConfig {
        timeout_secs: 3,
        handle_os_interrupt: true,
    };
    assert!(valid.validate().is_ok());
    assert_eq!(valid.timeout(), Duration::from_secs(3));
}

#[test]
fn test_runner_config_invalid_timeout() {
    let invalid = RunnerConfig {
        timeout_secs: 0,
        handle_os_interrupt: true,
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_coordination_config_requires_a_component() {
    let empty = CoordinationConfig {
        pools: HashMap::new(),
        runner: None,
    };
    assert!(empty.validate().is_err());
}

#[test]
fn test_coordination_config_validation() {
    let mut pools = HashMap::new();
    pools.insert("db".to_string(), PoolConfig { capacity: 2 });
    pools.insert("cache".to_string(), PoolConfig { capacity: 8 });

    let cfg = CoordinationConfig {
        pools,
        runner: Some(RunnerConfig {
            timeout_secs: 3,
            handle_os_interrupt: false,
        }),
    };
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_coordination_config_from_json() {
    let json = r#"{
        "pools": {
            "db": { "capacity": 2 }
        },
        "runner": { "timeout_secs": 3, "handle_os_interrupt": false }
    }"#;

    let cfg = CoordinationConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.pools["db"].capacity, 2);
    let runner = cfg.runner.unwrap();
    assert_eq!(runner.timeout_secs, 3);
    assert!(!runner.handle_os_interrupt);
}

#[test]
fn test_coordination_config_malformed_json() {
    let err = CoordinationConfig::from_json_str("{ pools: ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_coordination_config_invalid_runner_in_json() {
    let json = r#"{ "runner": { "timeout_secs": 0 } }"#;
    let err = CoordinationConfig::from_json_str(json).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_runner_config_from_env_missing_timeout() {
    let err = with_runner_env(None, None, RunnerConfig::from_env).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains(ENV_RUNNER_TIMEOUT_SECS));
}

#[test]
fn test_runner_config_from_env_non_numeric_timeout() {
    let err = with_runner_env(Some("three"), None, RunnerConfig::from_env).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains(ENV_RUNNER_TIMEOUT_SECS));
}

#[test]
fn test_runner_config_from_env_zero_timeout() {
    let err = with_runner_env(Some("0"), None, RunnerConfig::from_env).unwrap_err();
    assert!(err.to_string().contains("timeout_secs must be greater than 0"));
}

#[test]
fn test_runner_config_from_env_defaults_interrupt_on() {
    let cfg = with_runner_env(Some(" 7 "), None, RunnerConfig::from_env).unwrap();
    assert_eq!(cfg.timeout_secs, 7);
    assert!(cfg.handle_os_interrupt);
}

#[test]
fn test_runner_config_from_env_interrupt_disabled() {
    let cfg = with_runner_env(Some("3"), Some("false"), RunnerConfig::from_env).unwrap();
    assert_eq!(cfg.timeout(), Duration::from_secs(3));
    assert!(!cfg.handle_os_interrupt);
}

#[test]
fn test_runner_config_from_env_bad_interrupt_flag() {
    let err = with_runner_env(Some("3"), Some("sometimes"), RunnerConfig::from_env).unwrap_err();
    assert!(err.to_string().contains(ENV_RUNNER_HANDLE_INTERRUPT));
}
