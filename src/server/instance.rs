//! Running counterpart of a `ServerDescriptor`

use super::descriptor::ServerDescriptor;
use super::error::ShutdownError;
use super::shutdown::StopHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Lifecycle of one server
///
/// `Created → Starting → Serving → StopRequested → Stopped`, with
/// `Starting → Failed` on bind errors and `Serving → Failed` when the
/// server halts on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceState {
    Created,
    Starting,
    Serving { addr: SocketAddr },
    StopRequested,
    Stopped,
    Failed,
}

impl InstanceState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, InstanceState::Stopped | InstanceState::Failed)
    }
}

/// How a serving task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskExit {
    Stopped,
    /// Invalid address or bind error: no listener was ever held
    NeverBound,
    /// Stopped serving after a successful bind
    Failed,
}

/// Successful result of `ServerInstance::stop`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Drained and released its listener
    Stopped,
    /// Never bound or had already failed; nothing to release
    NotRunning,
}

/// Handle on a server started by the `Launcher`
pub struct ServerInstance {
    descriptor: Arc<ServerDescriptor>,
    state: Arc<watch::Sender<InstanceState>>,
    stop: StopHandle,
    task: Option<JoinHandle<TaskExit>>,
}

impl ServerInstance {
    pub(crate) fn new(
        descriptor: Arc<ServerDescriptor>,
        state: Arc<watch::Sender<InstanceState>>,
        stop: StopHandle,
        task: JoinHandle<TaskExit>,
    ) -> Self {
        Self {
            descriptor,
            state,
            stop,
            task: Some(task),
        }
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn state(&self) -> InstanceState {
        self.state.borrow().clone()
    }

    /// Bound address, while serving
    pub fn local_addr(&self) -> Option<SocketAddr> {
        match *self.state.borrow() {
            InstanceState::Serving { addr } => Some(addr),
            _ => None,
        }
    }

    /// Wait until the server either serves or fails
    ///
    /// Returns the bound address when serving.
    pub async fn wait_started(&self) -> Option<SocketAddr> {
        let mut receiver = self.state.subscribe();
        let state = receiver
            .wait_for(|s| !matches!(s, InstanceState::Created | InstanceState::Starting))
            .await
            .ok()?
            .clone();
        match state {
            InstanceState::Serving { addr } => Some(addr),
            _ => None,
        }
    }

    /// Stop accepting connections and drain in-flight requests within `grace`
    ///
    /// Only the first call does anything. Past the grace period the serving
    /// task is aborted so the listener is released.
    pub async fn stop(&mut self, grace: Duration) -> Result<StopOutcome, ShutdownError> {
        let Some(mut task) = self.task.take() else {
            return Err(ShutdownError::AlreadyStopped {
                server: self.name().to_string(),
            });
        };

        if self.state.borrow().is_terminal() {
            // Failure already reported; let the task finish on its own
            debug!(server = %self.name(), "Server already failed, nothing to stop");
            return Ok(StopOutcome::NotRunning);
        }

        self.state.send_replace(InstanceState::StopRequested);
        self.stop.stop();

        match tokio::time::timeout(grace, &mut task).await {
            Ok(Ok(TaskExit::Stopped)) => {
                self.state.send_replace(InstanceState::Stopped);
                Ok(StopOutcome::Stopped)
            }
            Ok(Ok(TaskExit::NeverBound)) => {
                // Bind failed after the stop request; the failure itself was
                // reported on the failure channel
                self.state.send_replace(InstanceState::Failed);
                Ok(StopOutcome::NotRunning)
            }
            Ok(Ok(TaskExit::Failed)) => {
                self.state.send_replace(InstanceState::Failed);
                Err(ShutdownError::Transport {
                    server: self.name().to_string(),
                    reason: "server failed while draining connections".to_string(),
                })
            }
            Ok(Err(join_error)) => {
                self.state.send_replace(InstanceState::Failed);
                Err(ShutdownError::Transport {
                    server: self.name().to_string(),
                    reason: join_error.to_string(),
                })
            }
            Err(_elapsed) => {
                task.abort();
                self.state.send_replace(InstanceState::Stopped);
                Err(ShutdownError::Timeout {
                    server: self.name().to_string(),
                    grace,
                })
            }
        }
    }
}

impl Drop for ServerInstance {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for ServerInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerInstance")
            .field("name", &self.name())
            .field("state", &self.state())
            .finish()
    }
}
