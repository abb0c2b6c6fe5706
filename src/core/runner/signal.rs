//! Process interrupt subscription for the runner.
//!
//! The signal is registered on the caller's thread before `subscribe`
//! returns, inside a current-thread tokio runtime built for the purpose. The
//! runtime then moves to a dedicated listener thread, the same way worker
//! threads get their own runtime, and waits there. A received signal raises
//! the runner's [`InterruptHandle`]. The subscription lasts until the
//! returned [`InterruptListener`] is dropped or a signal arrives.
//!
//! tokio keeps its process-wide handler installed after the first
//! subscription, so later Ctrl-C presses no longer terminate the process by
//! default. Embedders that need the default disposition back should disable
//! OS interrupt handling and raise the handle themselves.

use super::InterruptHandle;
use crate::core::RunnerError;

/// Live interrupt subscription. Dropping it releases the listener thread.
pub(super) struct InterruptListener {
    #[cfg(feature = "tokio-runtime")]
    _stop: tokio::sync::oneshot::Sender<()>,
}

/// Start listening for the process interrupt signal.
///
/// The OS handler is installed by the time this returns.
#[cfg(feature = "tokio-runtime")]
pub(super) fn subscribe(interrupt: InterruptHandle) -> Result<InterruptListener, RunnerError> {
    use tracing::{debug, error, warn};

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut registration = {
        let _guard = rt.enter();
        os::register()?
    };

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    std::thread::Builder::new()
        .name("runner-interrupt".into())
        .spawn(move || {
            rt.block_on(async move {
                tokio::select! {
                    received = os::recv(&mut registration) => match received {
                        Ok(()) => {
                            warn!("Received interrupt");
                            interrupt.interrupt();
                        }
                        Err(e) => error!(error = %e, "Failed to listen for interrupt"),
                    },
                    _ = stop_rx => debug!("Interrupt listener released"),
                }
            });
        })?;

    Ok(InterruptListener { _stop: stop_tx })
}

/// Without a signal runtime the handle can only be raised programmatically.
#[cfg(not(feature = "tokio-runtime"))]
pub(super) fn subscribe(_interrupt: InterruptHandle) -> Result<InterruptListener, RunnerError> {
    tracing::warn!("OS interrupt handling requires the `tokio-runtime` feature");
    Ok(InterruptListener {})
}

#[cfg(all(feature = "tokio-runtime", unix))]
mod os {
    use std::io;

    use tokio::signal::unix::{signal, Signal, SignalKind};

    /// Must be called inside a runtime context.
    pub(super) fn register() -> io::Result<Signal> {
        signal(SignalKind::interrupt())
    }

    pub(super) async fn recv(registration: &mut Signal) -> io::Result<()> {
        registration
            .recv()
            .await
            .ok_or_else(|| io::Error::other("interrupt stream closed"))
    }
}

#[cfg(all(feature = "tokio-runtime", windows))]
mod os {
    use std::io;

    use tokio::signal::windows::{ctrl_c, CtrlC};

    /// Must be called inside a runtime context.
    pub(super) fn register() -> io::Result<CtrlC> {
        ctrl_c()
    }

    pub(super) async fn recv(registration: &mut CtrlC) -> io::Result<()> {
        registration
            .recv()
            .await
            .ok_or_else(|| io::Error::other("interrupt stream closed"))
    }
}
