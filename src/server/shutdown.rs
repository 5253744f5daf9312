//! Termination signals and per-server stop channels
//!
//! `SignalListener` is the operator side of a shutdown trigger.
//! `stop_channel` links one `ServerInstance` to its serving task.

use std::fmt;
use tokio::sync::watch;
use tracing::info;

/// External termination request received by the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    Interrupt,
    Terminate,
}

impl TerminationSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationSignal::Interrupt => "SIGINT",
            TerminationSignal::Terminate => "SIGTERM",
        }
    }
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Held by one serving task; resolves once its instance asks it to stop
///
/// Also resolves when the `StopHandle` is dropped, so a task never outlives
/// the instance that owns it.
#[derive(Clone)]
pub struct StopSignal {
    requested: watch::Receiver<bool>,
}

impl StopSignal {
    pub async fn wait(&mut self) {
        // Err means the handle is gone
        let _ = self.requested.wait_for(|requested| *requested).await;
    }

    /// Has an explicit stop been requested? A dropped handle does not count.
    pub fn is_stopped(&self) -> bool {
        *self.requested.borrow()
    }
}

/// Owned by a `ServerInstance`, fires its task's `StopSignal`
pub struct StopHandle {
    requested: watch::Sender<bool>,
}

impl StopHandle {
    /// Request the stop; returns false if it had already been requested
    pub fn stop(&self) -> bool {
        self.requested.send_if_modified(|requested| {
            let first = !*requested;
            *requested = true;
            first
        })
    }
}

/// One stop pair per server: the handle stays with the instance, the signal
/// moves into the serving task
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (requested, receiver) = watch::channel(false);
    (
        StopHandle { requested },
        StopSignal {
            requested: receiver,
        },
    )
}

/// Registered SIGTERM/SIGINT handlers
///
/// Register before launching any server: a registration error is a
/// startup error.
pub struct SignalListener {
    #[cfg(unix)]
    sigterm: tokio::signal::unix::Signal,
    #[cfg(unix)]
    sigint: tokio::signal::unix::Signal,
}

impl SignalListener {
    #[cfg(unix)]
    pub fn register() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        let sigterm = signal(SignalKind::terminate())?;
        let sigint = signal(SignalKind::interrupt())?;
        Ok(Self { sigterm, sigint })
    }

    #[cfg(not(unix))]
    pub fn register() -> std::io::Result<Self> {
        Ok(Self {})
    }

    /// Wait for SIGTERM or SIGINT
    #[cfg(unix)]
    pub async fn recv(mut self) -> TerminationSignal {
        tokio::select! {
            _ = self.sigterm.recv() => {
                info!("Received SIGTERM");
                TerminationSignal::Terminate
            }
            _ = self.sigint.recv() => {
                info!("Received SIGINT");
                TerminationSignal::Interrupt
            }
        }
    }

    /// Wait for Ctrl+C (Windows)
    #[cfg(not(unix))]
    pub async fn recv(self) -> TerminationSignal {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to wait for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C");
        TerminationSignal::Interrupt
    }
}
