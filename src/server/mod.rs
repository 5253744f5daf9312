//! Multi-server lifecycle
//!
//! Starts a fixed set of HTTP servers in parallel, waits for the first
//! server failure or termination signal, then stops every server within a
//! per-server grace period:
//! - `Launcher` - one task per `ServerDescriptor`, failures on a bounded channel
//! - `wait_for_trigger` - first of failure or SIGTERM/SIGINT
//! - `ShutdownCoordinator` - sequential, time-bounded stop of each instance
//! - `Supervisor` - all of the above as one call

mod coordinator;
mod descriptor;
mod diagnostics;
mod error;
mod instance;
mod launcher;
pub mod shutdown;
mod supervisor;
mod trigger;

pub use coordinator::{InstanceShutdown, ShutdownCoordinator, ShutdownReport, DEFAULT_GRACE_PERIOD};
pub use descriptor::ServerDescriptor;
pub use diagnostics::{diagnostics_router, ReadinessState};
pub use error::{ServeError, ShutdownError};
pub use instance::{InstanceState, ServerInstance, StopOutcome};
pub use launcher::{FailureSignal, Launched, Launcher};
pub use shutdown::{stop_channel, SignalListener, StopHandle, StopSignal, TerminationSignal};
pub use supervisor::{RunOutcome, Supervisor};
pub use trigger::{wait_for_trigger, ShutdownTrigger};

#[cfg(test)]
#[path = "diagnostics_test.rs"]
mod diagnostics_tests;

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod shutdown_tests;

#[cfg(test)]
#[path = "instance_test.rs"]
mod instance_tests;

#[cfg(test)]
pub(crate) mod test_support;
