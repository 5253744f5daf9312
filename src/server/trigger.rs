//! The single event that ends the wait and starts shutdown

use super::launcher::FailureSignal;
use super::shutdown::TerminationSignal;
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Why the process is shutting down
#[derive(Debug)]
pub enum ShutdownTrigger {
    /// A server failed to bind or stopped serving
    Failure(FailureSignal),
    /// The operator asked the process to stop
    Signal(TerminationSignal),
}

impl ShutdownTrigger {
    /// The failure behind this shutdown, absent on a clean signal
    pub fn failure(&self) -> Option<&FailureSignal> {
        match self {
            ShutdownTrigger::Failure(failure) => Some(failure),
            ShutdownTrigger::Signal(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure().is_some()
    }
}

impl std::fmt::Display for ShutdownTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownTrigger::Failure(failure) => write!(f, "failure of {}", failure),
            ShutdownTrigger::Signal(signal) => write!(f, "signal {}", signal),
        }
    }
}

/// Wait for the first server failure or termination signal
///
/// Whichever resolves first wins; the other source is dropped. If every
/// server task is gone without reporting, only the signal is awaited.
pub async fn wait_for_trigger<S>(
    failures: &mut mpsc::Receiver<FailureSignal>,
    signal: S,
) -> ShutdownTrigger
where
    S: Future<Output = TerminationSignal>,
{
    let first_failure = async {
        match failures.recv().await {
            Some(failure) => failure,
            None => std::future::pending().await,
        }
    };

    let trigger = tokio::select! {
        failure = first_failure => ShutdownTrigger::Failure(failure),
        received = signal => ShutdownTrigger::Signal(received),
    };

    match &trigger {
        ShutdownTrigger::Failure(failure) => {
            warn!(server = %failure.server, error = %failure.error, "Got an error, shutting down");
        }
        ShutdownTrigger::Signal(signal) => {
            info!(signal = %signal, "Received the signal, shutting down");
        }
    }

    trigger
}

#[cfg(test)]
#[path = "trigger_test.rs"]
mod tests;
