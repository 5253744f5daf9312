//! Application server routes
//!
//! - `GET /` - hello handler, lists the pods of the configured namespace

pub mod cluster;

pub use cluster::{ClusterError, KubePodLister, PodLister, UnavailablePodLister};

use crate::config::ClusterConfig;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Body of a successful hello response
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PodList {
    pub pods: Vec<String>,
}

async fn hello(State(lister): State<Arc<dyn PodLister>>) -> impl IntoResponse {
    info!("The hello handler was called");

    match lister.list_pod_names().await {
        Ok(pods) => (StatusCode::OK, Json(PodList { pods })).into_response(),
        Err(e) => {
            warn!(error = %e, "Hello handler failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Build the router for the application server
pub fn app_router(lister: Arc<dyn PodLister>) -> Router {
    Router::new().route("/", get(hello)).with_state(lister)
}

/// Pick the pod lister for the configured cluster
///
/// A client that cannot be built does not stop the process; the hello
/// handler reports the error instead.
pub fn pod_lister(config: &ClusterConfig) -> Arc<dyn PodLister> {
    match KubePodLister::new(config) {
        Ok(lister) => {
            info!(
                api_url = %config.api_url,
                namespace = %config.namespace,
                "Kubernetes client configured"
            );
            Arc::new(lister)
        }
        Err(e) => {
            warn!(error = %e, "Kubernetes client unavailable");
            Arc::new(UnavailablePodLister::new(e))
        }
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;
