//! Launch, wait for a trigger, shut everything down

use super::coordinator::{ShutdownCoordinator, ShutdownReport, DEFAULT_GRACE_PERIOD};
use super::descriptor::ServerDescriptor;
use super::diagnostics::ReadinessState;
use super::launcher::Launcher;
use super::shutdown::TerminationSignal;
use super::trigger::{wait_for_trigger, ShutdownTrigger};
use std::future::Future;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

/// How a supervised run ended
#[derive(Debug)]
pub struct RunOutcome {
    pub trigger: ShutdownTrigger,
    pub report: ShutdownReport,
}

impl RunOutcome {
    /// 1 if a server failure triggered the shutdown, 0 on a signal
    ///
    /// Shutdown errors after a signal are logged but keep a success exit.
    pub fn exit_status(&self) -> u8 {
        if self.trigger.is_failure() {
            1
        } else {
            0
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

/// Runs a fixed set of servers as one unit
pub struct Supervisor {
    descriptors: Vec<ServerDescriptor>,
    grace: Duration,
    readiness: Option<ReadinessState>,
}

impl Supervisor {
    pub fn new(descriptors: Vec<ServerDescriptor>) -> Self {
        Self {
            descriptors,
            grace: DEFAULT_GRACE_PERIOD,
            readiness: None,
        }
    }

    /// Grace period allowed to each server on shutdown
    pub fn grace_period(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Readiness flag to raise after launch and drop on shutdown
    pub fn readiness(mut self, readiness: ReadinessState) -> Self {
        self.readiness = Some(readiness);
        self
    }

    /// Run until the first server failure or `signal` resolves, then stop
    /// every server
    pub async fn run<S>(self, signal: S) -> RunOutcome
    where
        S: Future<Output = TerminationSignal>,
    {
        let count = self.descriptors.len();
        let mut launched = Launcher::launch(self.descriptors);
        info!(servers = count, "Servers launched");

        if let Some(readiness) = &self.readiness {
            readiness.set_ready();
        }

        let trigger = wait_for_trigger(&mut launched.failures, signal).await;

        if let Some(readiness) = &self.readiness {
            readiness.set_not_ready();
        }

        let coordinator = ShutdownCoordinator::new(self.grace);
        let report = coordinator.shutdown(&mut launched.instances).await;

        match trigger.failure() {
            Some(failure) => error!(
                server = %failure.server,
                error = %failure.error,
                errors = report.errors().count(),
                "Shut down after server failure"
            ),
            None => info!(
                cause = %trigger,
                errors = report.errors().count(),
                "Shut down on request"
            ),
        }

        RunOutcome { trigger, report }
    }
}

#[cfg(test)]
#[path = "supervisor_test.rs"]
mod tests;
