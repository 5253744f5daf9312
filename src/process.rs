//! From configuration to a supervised pair of servers

use crate::app::{app_router, pod_lister};
use crate::config::{Config, ConfigError};
use crate::server::{
    diagnostics_router, ReadinessState, RunOutcome, ServerDescriptor, Supervisor,
    TerminationSignal,
};
use std::future::Future;
use tracing::{error, info};

/// The application and diagnostics servers for `config`
pub fn server_descriptors(config: &Config, readiness: &ReadinessState) -> Vec<ServerDescriptor> {
    vec![
        ServerDescriptor::new(
            "application server",
            format!(":{}", config.app_port),
            app_router(pod_lister(&config.cluster)),
        ),
        ServerDescriptor::new(
            "diagnostics server",
            format!(":{}", config.diag_port),
            diagnostics_router(readiness.clone()),
        ),
    ]
}

/// Load configuration, then run both servers until `signal` or a failure
///
/// A configuration error returns before any server is started.
pub async fn run<F, S>(lookup: F, signal: S) -> Result<RunOutcome, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    S: Future<Output = TerminationSignal>,
{
    let config = match Config::from_lookup(lookup) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e);
        }
    };
    info!(
        app_port = %config.app_port,
        diag_port = %config.diag_port,
        grace = ?config.shutdown_grace,
        "Configuration loaded"
    );

    // Install ring as the default crypto provider for rustls (used by kube)
    let _ = rustls::crypto::ring::default_provider().install_default();

    let readiness = ReadinessState::new();
    let descriptors = server_descriptors(&config, &readiness);

    Ok(Supervisor::new(descriptors)
        .grace_period(config.shutdown_grace)
        .readiness(readiness)
        .run(signal)
        .await)
}

#[cfg(test)]
#[path = "process_test.rs"]
mod tests;
