use std::time::Duration;
use thiserror::Error;

/// Fatal per-server error: the server could not start or stopped serving
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("invalid listen address {address:?}")]
    InvalidAddress { address: String },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server stopped unexpectedly: {0}")]
    Serve(#[source] std::io::Error),
}

impl ServeError {
    /// Whether the server failed before holding a listener
    pub fn is_startup(&self) -> bool {
        matches!(self, ServeError::InvalidAddress { .. } | ServeError::Bind { .. })
    }
}

/// Non-fatal per-server error raised while stopping
#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("{server} did not stop within {grace:?}")]
    Timeout { server: String, grace: Duration },

    #[error("{server} failed during shutdown: {reason}")]
    Transport { server: String, reason: String },

    #[error("{server} was already stopped")]
    AlreadyStopped { server: String },
}
