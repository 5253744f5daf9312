//! Routes served by the diagnostics server
//!
//! `GET /healthz` always answers `OK`. `GET /readyz` answers `OK` between
//! launch and the shutdown trigger, `503 Service Unavailable` otherwise.

use axum::{extract::State, http::StatusCode, routing::get, Router};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Flag behind `/readyz`, shared between the supervisor and the router
///
/// Starts lowered. The supervisor raises it after launch and lowers it the
/// moment a shutdown trigger fires, before any server is stopped.
#[derive(Debug, Clone)]
pub struct ReadinessState {
    ready: Arc<AtomicBool>,
}

impl ReadinessState {
    pub fn new() -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_ready(&self) {
        self.ready.store(true, Ordering::SeqCst);
    }

    /// `/readyz` answers 503 from now on
    pub fn set_not_ready(&self) {
        self.ready.store(false, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

impl Default for ReadinessState {
    fn default() -> Self {
        Self::new()
    }
}

/// Answers as long as the diagnostics server accepts connections
async fn healthz() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

async fn readyz(State(readiness): State<ReadinessState>) -> (StatusCode, &'static str) {
    if readiness.is_ready() {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable")
    }
}

/// `/healthz` and `/readyz`, both plain text
pub fn diagnostics_router(readiness: ReadinessState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .with_state(readiness)
}
