//! Time-bounded shutdown of every running server
//!
//! Servers are stopped one after another in start order. Each one gets its
//! own grace period; a timeout or error on one server is logged and the
//! next server is still stopped.

use super::error::ShutdownError;
use super::instance::{ServerInstance, StopOutcome};
use std::time::Duration;
use tracing::{error, info, warn};

/// Grace period given to each server when none is configured
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Result of stopping one server
#[derive(Debug)]
pub struct InstanceShutdown {
    pub name: String,
    pub result: Result<StopOutcome, ShutdownError>,
}

/// Per-server results, in the order the servers were stopped
#[derive(Debug, Default)]
pub struct ShutdownReport {
    pub entries: Vec<InstanceShutdown>,
}

impl ShutdownReport {
    /// Number of servers a stop was attempted on
    pub fn attempted(&self) -> usize {
        self.entries.len()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ShutdownError> {
        self.entries.iter().filter_map(|e| e.result.as_ref().err())
    }

    pub fn is_clean(&self) -> bool {
        self.errors().next().is_none()
    }
}

pub struct ShutdownCoordinator {
    grace: Duration,
}

impl ShutdownCoordinator {
    pub fn new(grace: Duration) -> Self {
        Self { grace }
    }

    /// Stop every instance, never skipping one because another failed
    pub async fn shutdown(&self, instances: &mut [ServerInstance]) -> ShutdownReport {
        let mut report = ShutdownReport::default();

        for instance in instances.iter_mut() {
            info!(
                server = %instance.name(),
                timeout = ?self.grace,
                "Shutdown with timeout"
            );

            let result = instance.stop(self.grace).await;
            match &result {
                Ok(StopOutcome::Stopped) => {
                    info!(server = %instance.name(), "Server gracefully stopped");
                }
                Ok(StopOutcome::NotRunning) => {
                    info!(server = %instance.name(), "Server was not running");
                }
                Err(e @ ShutdownError::Timeout { .. }) => {
                    warn!(server = %instance.name(), error = %e, "Server shutdown timed out");
                }
                Err(e) => {
                    error!(server = %instance.name(), error = %e, "Server shutdown failed");
                }
            }

            report.entries.push(InstanceShutdown {
                name: instance.name().to_string(),
                result,
            });
        }

        report
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_GRACE_PERIOD)
    }
}

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod tests;
