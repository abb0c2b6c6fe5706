//! Sequential task runner bounded by a deadline and process interrupts.
//!
//! A `Runner` executes an ordered list of index-aware tasks on one dedicated
//! executor thread. `start` blocks the caller until the sequence completes or
//! the deadline fires, whichever comes first.
//!
//! # Semantics
//!
//! - The deadline is armed when the runner is constructed, not when it starts.
//! - Interrupts are cooperative: the executor checks for one before each task
//!   and never aborts a task in flight.
//! - A timeout only stops the caller's wait. The executor thread is detached
//!   and keeps running until it finishes or observes an interrupt.
//!
//! # Example
//!
//! ```rust,ignore
//! use prometheus_pool_runner::core::Runner;
//! use std::time::Duration;
//!
//! let mut runner = Runner::new(Duration::from_secs(3));
//! runner.add(|id| println!("processor - task #{id}"));
//! runner.add(|id| println!("processor - task #{id}"));
//!
//! match runner.start() {
//!     Ok(()) => println!("process ended"),
//!     Err(e) => eprintln!("terminating: {e}"),
//! }
//! ```

mod signal;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{after, bounded, select, Receiver};
use tracing::{debug, error, info, warn};

use crate::config::RunnerConfig;
use crate::core::{ConfigError, RunnerError};

/// A unit of work receiving its position in the sequence.
pub type Task = Box<dyn FnOnce(usize) + Send + 'static>;

/// Lifecycle of a runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// Accepting tasks; `start` not yet called.
    Idle,
    /// `start` is waiting on the executor.
    Running,
    /// Every task ran.
    Completed,
    /// The deadline fired before the sequence finished.
    TimedOut,
    /// An interrupt stopped the sequence between tasks.
    Interrupted,
    /// The executor could not be spawned or died mid-sequence.
    Failed,
}

/// Cooperative interrupt latch shared with the executor thread.
///
/// Raising it has the same effect as the process receiving Ctrl-C: the
/// executor stops before the next task.
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle {
    flag: Arc<AtomicBool>,
}

impl InterruptHandle {
    /// Request that the runner stop at the next task boundary.
    pub fn interrupt(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether an interrupt is pending.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Consume a pending interrupt.
    fn take(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }
}

/// Runs tasks in order under a deadline.
pub struct Runner {
    tasks: Vec<Task>,
    /// Single-fire deadline timer.
    timeout: Receiver<Instant>,
    interrupt: InterruptHandle,
    handle_os_interrupt: bool,
    state: RunnerState,
}

impl Runner {
    /// Create a runner whose deadline elapses `duration` from now.
    ///
    /// OS interrupt handling is enabled by default.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            tasks: Vec::new(),
            timeout: after(duration),
            interrupt: InterruptHandle::default(),
            handle_os_interrupt: true,
            state: RunnerState::Idle,
        }
    }

    /// Create a runner from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the configuration fails validation.
    pub fn from_config(config: &RunnerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config.timeout()).with_os_interrupt(config.handle_os_interrupt))
    }

    /// Enable or disable subscribing to the process interrupt signal on `start`.
    #[must_use]
    pub fn with_os_interrupt(mut self, enabled: bool) -> Self {
        self.handle_os_interrupt = enabled;
        self
    }

    /// Append a task to the sequence.
    pub fn add<T>(&mut self, task: T)
    where
        T: FnOnce(usize) + Send + 'static,
    {
        self.tasks.push(Box::new(task));
    }

    /// Append several tasks, preserving their order.
    pub fn add_tasks<I>(&mut self, tasks: I)
    where
        I: IntoIterator<Item = Task>,
    {
        self.tasks.extend(tasks);
    }

    /// Handle for raising an interrupt from outside the runner.
    #[must_use]
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupt.clone()
    }

    /// Number of tasks queued and not yet handed to the executor.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no tasks are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> RunnerState {
        self.state
    }

    /// Run every task on a background thread and wait for the outcome.
    ///
    /// May only be called once.
    ///
    /// # Errors
    ///
    /// - `RunnerError::Timeout` if the deadline fires first
    /// - `RunnerError::Interrupt` if an interrupt was observed between tasks
    /// - `RunnerError::AlreadyStarted` on a second call
    /// - `RunnerError::TaskPanicked` if a task panicked
    /// - `RunnerError::Spawn` if a background thread could not be created
    pub fn start(&mut self) -> Result<(), RunnerError> {
        if self.state != RunnerState::Idle {
            return Err(RunnerError::AlreadyStarted);
        }
        self.state = RunnerState::Running;

        let result = self.launch();

        self.state = match &result {
            Ok(()) => RunnerState::Completed,
            Err(RunnerError::Timeout) => RunnerState::TimedOut,
            Err(RunnerError::Interrupt) => RunnerState::Interrupted,
            Err(_) => RunnerState::Failed,
        };
        result
    }

    fn launch(&mut self) -> Result<(), RunnerError> {
        let tasks = std::mem::take(&mut self.tasks);
        info!(task_count = tasks.len(), "Runner starting");

        let listener = if self.handle_os_interrupt {
            Some(signal::subscribe(self.interrupt.clone())?)
        } else {
            None
        };

        let (complete_tx, complete_rx) = bounded(1);
        let interrupt = self.interrupt.clone();

        // Never joined: after a timeout the executor keeps running detached.
        let _executor = thread::Builder::new()
            .name("runner-executor".into())
            .spawn(move || {
                // Held until the sequence ends; dropping it unsubscribes.
                let _listener = listener;
                let result = run(tasks, &interrupt);
                // Nobody is listening after a timeout.
                let _ = complete_tx.send(result);
            })?;

        select! {
            recv(complete_rx) -> msg => match msg {
                Ok(result) => result,
                Err(_) => {
                    error!("Executor thread exited without a result");
                    Err(RunnerError::TaskPanicked)
                }
            },
            recv(self.timeout) -> _ => {
                warn!("Runner deadline elapsed, executor left running");
                Err(RunnerError::Timeout)
            }
        }
    }
}

/// Execute tasks in order, stopping at the first pending interrupt.
fn run(tasks: Vec<Task>, interrupt: &InterruptHandle) -> Result<(), RunnerError> {
    for (id, task) in tasks.into_iter().enumerate() {
        if interrupt.take() {
            warn!(task_id = id, "Interrupt observed, abandoning remaining tasks");
            return Err(RunnerError::Interrupt);
        }
        debug!(task_id = id, "Running task");
        task(id);
    }
    Ok(())
}
