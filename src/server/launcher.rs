//! Start every configured server concurrently
//!
//! Each descriptor gets its own tokio task. A task that fails to bind or
//! stops serving pushes a `FailureSignal` onto a bounded channel sized to
//! the number of servers, so reporting never blocks.

use super::descriptor::ServerDescriptor;
use super::error::ServeError;
use super::instance::{InstanceState, ServerInstance, TaskExit};
use super::shutdown::{stop_channel, StopSignal};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

/// A server that failed to bind or stopped serving on its own
#[derive(Debug)]
pub struct FailureSignal {
    pub server: String,
    pub error: ServeError,
}

impl std::fmt::Display for FailureSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.server, self.error)
    }
}

/// Instances in descriptor order plus the failure channel they report on
pub struct Launched {
    pub instances: Vec<ServerInstance>,
    pub failures: mpsc::Receiver<FailureSignal>,
}

pub struct Launcher;

impl Launcher {
    /// Spawn one serving task per descriptor
    ///
    /// Returns immediately; binding happens inside the tasks. Slot `i` of
    /// `instances` always belongs to `descriptors[i]`.
    pub fn launch(descriptors: Vec<ServerDescriptor>) -> Launched {
        let (failure_tx, failures) = mpsc::channel(descriptors.len().max(1));

        let instances = descriptors
            .into_iter()
            .map(|descriptor| {
                let descriptor = Arc::new(descriptor);
                let (state, _) = watch::channel(InstanceState::Created);
                let state = Arc::new(state);
                let (stop, stop_signal) = stop_channel();

                let task = tokio::spawn(run_server(
                    descriptor.clone(),
                    state.clone(),
                    stop_signal,
                    failure_tx.clone(),
                ));

                ServerInstance::new(descriptor, state, stop, task)
            })
            .collect();

        Launched {
            instances,
            failures,
        }
    }
}

async fn run_server(
    descriptor: Arc<ServerDescriptor>,
    state: Arc<watch::Sender<InstanceState>>,
    stop: StopSignal,
    failures: mpsc::Sender<FailureSignal>,
) -> TaskExit {
    let name = descriptor.name();
    info!(
        server = %name,
        address = %descriptor.address(),
        "The {} is preparing to handle connections", name
    );

    match serve(&descriptor, &state, stop).await {
        Ok(()) => {
            info!(server = %name, "Server stopped accepting connections");
            TaskExit::Stopped
        }
        Err(e) => {
            error!(server = %name, error = %e, "Server failed");
            let exit = if e.is_startup() {
                TaskExit::NeverBound
            } else {
                TaskExit::Failed
            };
            // Published before reporting so the coordinator never sees a
            // reported server in a pre-failure state
            state.send_replace(InstanceState::Failed);
            let signal = FailureSignal {
                server: name.to_string(),
                error: e,
            };
            if let Err(e) = failures.try_send(signal) {
                // Capacity covers one failure per server, so only a closed
                // channel (coordinator gone) ends up here
                warn!(server = %name, error = %e, "Failure could not be reported");
            }
            exit
        }
    }
}

async fn serve(
    descriptor: &ServerDescriptor,
    state: &watch::Sender<InstanceState>,
    stop: StopSignal,
) -> Result<(), ServeError> {
    state.send_if_modified(|current| {
        if *current == InstanceState::Created {
            *current = InstanceState::Starting;
            true
        } else {
            false
        }
    });

    let address = descriptor.bind_address()?;
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServeError::Bind {
            address: address.clone(),
            source,
        })?;
    let addr = listener
        .local_addr()
        .map_err(|source| ServeError::Bind { address, source })?;

    // A stop requested while binding keeps its StopRequested state
    state.send_if_modified(|current| {
        if *current == InstanceState::Starting {
            *current = InstanceState::Serving { addr };
            true
        } else {
            false
        }
    });
    info!(server = %descriptor.name(), addr = %addr, "Server listening (HTTP)");

    let mut graceful = stop.clone();
    axum::serve(listener, descriptor.router())
        .with_graceful_shutdown(async move { graceful.wait().await })
        .await
        .map_err(ServeError::Serve)?;

    if stop.is_stopped() {
        Ok(())
    } else {
        Err(ServeError::Serve(std::io::Error::other(
            "server exited without a stop request",
        )))
    }
}

#[cfg(test)]
#[path = "launcher_test.rs"]
mod tests;
