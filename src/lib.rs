//! # Prometheus Pool Runner
//!
//! Two coordination primitives for scarce resources and bounded-lifetime work.
//!
//! ## ResourcePool
//!
//! A thread-safe cache of reusable closable resources (connections, handles).
//! Idle resources are recycled; when none is idle the caller-supplied factory
//! creates one. At most `capacity` idle resources are retained and any excess
//! is closed on release. Closing the pool closes everything still idle.
//!
//! ```rust,ignore
//! use prometheus_pool_runner::core::{ResourcePool, Resource, AppResult};
//!
//! let pool = ResourcePool::new(|| open_connection(), 2)?;
//! let conn = pool.acquire()?;
//! run_query(&conn);
//! pool.release(conn);
//! pool.close();
//! ```
//!
//! ## Runner
//!
//! Executes an ordered list of index-aware tasks on a background thread,
//! racing completion against a deadline and the process interrupt signal.
//!
//! ```rust,ignore
//! use prometheus_pool_runner::core::{Runner, RunnerError};
//! use std::time::Duration;
//!
//! let mut runner = Runner::new(Duration::from_secs(3));
//! runner.add(|id| println!("task #{id}"));
//!
//! match runner.start() {
//!     Ok(()) => {}
//!     Err(RunnerError::Timeout) => std::process::exit(1),
//!     Err(RunnerError::Interrupt) => std::process::exit(2),
//!     Err(e) => panic!("{e}"),
//! }
//! ```
//!
//! Both types are plain per-instance values; there is no global state.
//!
//! For complete examples, see:
//! - `tests/pool_test.rs` - pool reuse, overflow and shutdown
//! - `tests/runner_test.rs` - completion, timeout and interrupt

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Resource pool, task runner, and their error types.
pub mod core;
/// Configuration models for pools and runners.
pub mod config;
/// Builders to construct components from configuration.
pub mod builders;
/// Shared utilities.
pub mod util;
