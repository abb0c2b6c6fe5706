//! Bounded cache of reusable closable resources.
//!
//! `ResourcePool` hands out resources to concurrent callers, takes them back
//! for reuse, and bounds how many *idle* resources it keeps around. It never
//! blocks waiting for capacity: when no idle resource is available the
//! factory is invoked, so the number of checked-out resources may exceed the
//! capacity at any time.
//!
//! # Design
//!
//! - **Free list**: a bounded `crossbeam_channel` sized to the capacity.
//!   `acquire` pops from it with `try_recv`, which needs no pool lock.
//! - **Closed state**: the push side of the free list lives behind a
//!   `parking_lot::Mutex<Option<Sender>>`. `None` means closed. `release` and
//!   `close` serialize on this lock.
//! - **Shutdown is a best-effort drain**: `close` drops the sender and then
//!   closes every idle resource it can still receive. An `acquire` running
//!   concurrently may win an idle resource before the drain reaches it; once
//!   the free list is empty and disconnected, `acquire` returns
//!   [`PoolError::Closed`]. No stronger barrier is applied.
//!
//! # Example
//!
//! ```rust,ignore
//! use prometheus_pool_runner::core::{AppResult, Resource, ResourcePool};
//!
//! struct Conn(std::net::TcpStream);
//!
//! impl Resource for Conn {
//!     fn close(self) -> AppResult<()> {
//!         self.0.shutdown(std::net::Shutdown::Both)?;
//!         Ok(())
//!     }
//! }
//!
//! let pool = ResourcePool::new(|| Ok(Conn(std::net::TcpStream::connect("db:5432")?)), 4)?;
//! let conn = pool.acquire()?;
//! // ... use conn ...
//! pool.release(conn);
//! pool.close();
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::core::{AppResult, PoolError};

/// A handle to a scarce external asset that can be released.
///
/// Whether closing twice is safe is up to the implementor; the pool closes
/// each resource it discards exactly once.
pub trait Resource: Send + 'static {
    /// Release the underlying OS or network state.
    ///
    /// # Errors
    ///
    /// Any error is logged by the pool and otherwise ignored; the resource is
    /// considered gone either way.
    fn close(self) -> AppResult<()>;
}

/// Snapshot of pool utilization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Maximum number of idle resources retained.
    pub capacity: usize,
    /// Idle resources currently buffered.
    pub idle: usize,
    /// Resources produced by the factory.
    pub created: u64,
    /// Acquisitions served from the idle buffer.
    pub reused: u64,
    /// Releases that put a resource back into the buffer.
    pub released: u64,
    /// Resources closed by the pool (buffer full, pool closed, or drained).
    pub discarded: u64,
}

#[derive(Debug, Default)]
struct PoolCounters {
    created: AtomicU64,
    reused: AtomicU64,
    released: AtomicU64,
    discarded: AtomicU64,
}

impl PoolCounters {
    fn snapshot(&self, capacity: usize, idle: usize) -> PoolStats {
        PoolStats {
            capacity,
            idle,
            created: self.created.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            released: self.released.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}

/// Thread-safe pool of reusable resources.
///
/// Share it between threads with `Arc`. Dropping the pool closes it.
pub struct ResourcePool<R, F>
where
    R: Resource,
    F: Fn() -> AppResult<R>,
{
    capacity: usize,
    /// Push side of the free list; taken on close.
    sender: Mutex<Option<Sender<R>>>,
    /// Pop side of the free list, read without the lock.
    receiver: Receiver<R>,
    factory: F,
    counters: PoolCounters,
}

impl<R, F> ResourcePool<R, F>
where
    R: Resource,
    F: Fn() -> AppResult<R>,
{
    /// Create a pool retaining at most `capacity` idle resources.
    ///
    /// No resources are created up front.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::InvalidCapacity` if `capacity` is zero.
    pub fn new(factory: F, capacity: usize) -> Result<Self, PoolError> {
        if capacity == 0 {
            return Err(PoolError::InvalidCapacity(capacity));
        }

        let (sender, receiver) = bounded(capacity);
        debug!(capacity = capacity, "Resource pool created");

        Ok(Self {
            capacity,
            sender: Mutex::new(Some(sender)),
            receiver,
            factory,
            counters: PoolCounters::default(),
        })
    }

    /// Take a resource from the pool, creating one if none is idle.
    ///
    /// Never blocks.
    ///
    /// # Errors
    ///
    /// - `PoolError::Factory` if a new resource was needed and the factory failed
    /// - `PoolError::Closed` if the pool has been closed and drained
    pub fn acquire(&self) -> Result<R, PoolError> {
        match self.receiver.try_recv() {
            Ok(resource) => {
                self.counters.reused.fetch_add(1, Ordering::Relaxed);
                debug!("Acquired existing resource");
                Ok(resource)
            }
            Err(TryRecvError::Empty) => {
                debug!("Acquire: new resource");
                let resource = (self.factory)().map_err(PoolError::Factory)?;
                self.counters.created.fetch_add(1, Ordering::Relaxed);
                Ok(resource)
            }
            Err(TryRecvError::Disconnected) => Err(PoolError::Closed),
        }
    }

    /// Return a resource to the pool.
    ///
    /// The resource is buffered for reuse if the pool is open and has room;
    /// otherwise it is closed.
    pub fn release(&self, resource: R) {
        let sender = self.sender.lock();

        let Some(sender) = sender.as_ref() else {
            debug!("Release on closed pool: closing resource");
            self.discard(resource);
            return;
        };

        match sender.try_send(resource) {
            Ok(()) => {
                self.counters.released.fetch_add(1, Ordering::Relaxed);
                debug!("Released resource");
            }
            // The pool owns the receiver, so a disconnect can't happen while
            // the sender is present. Treat it like a full buffer regardless.
            Err(TrySendError::Full(resource) | TrySendError::Disconnected(resource)) => {
                debug!("Release: pool full, closing resource");
                self.discard(resource);
            }
        }
    }

    /// Shut the pool down and close every idle resource.
    ///
    /// Idempotent. Resources still checked out are closed when released.
    pub fn close(&self) {
        let mut sender = self.sender.lock();

        // Dropping the only sender disconnects the free list.
        if sender.take().is_none() {
            return;
        }

        let mut drained = 0_usize;
        for resource in self.receiver.try_iter() {
            self.discard(resource);
            drained += 1;
        }

        info!(drained = drained, "Resource pool closed");
    }

    /// Maximum number of idle resources retained.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of idle resources currently buffered.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.receiver.len()
    }

    /// Whether `close` has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.lock().is_none()
    }

    /// Current pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.counters.snapshot(self.capacity, self.idle())
    }

    fn discard(&self, resource: R) {
        self.counters.discarded.fetch_add(1, Ordering::Relaxed);
        if let Err(e) = resource.close() {
            warn!(error = %e, "Failed to close resource");
        }
    }
}

impl<R, F> Drop for ResourcePool<R, F>
where
    R: Resource,
    F: Fn() -> AppResult<R>,
{
    fn drop(&mut self) {
        self.close();
    }
}
