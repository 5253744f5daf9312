//! Pod listing against the Kubernetes API

use crate::config::ClusterConfig;
use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderValue};
use k8s_openapi::api::core::v1::Pod;
use kube::api::ListParams;
use kube::{Api, Client, ResourceExt};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Couldn't create a k8s client: {0}")]
    Client(String),

    #[error("Couldn't get the list of pods: {0}")]
    List(String),
}

/// Lists pod names in one namespace
#[async_trait]
pub trait PodLister: Send + Sync {
    async fn list_pod_names(&self) -> Result<Vec<String>, ClusterError>;
}

/// `PodLister` backed by a kube client
pub struct KubePodLister {
    client: Client,
    namespace: String,
}

impl KubePodLister {
    pub fn new(config: &ClusterConfig) -> Result<Self, ClusterError> {
        let cluster_url = config
            .api_url
            .parse()
            .map_err(|e| ClusterError::Client(format!("invalid API url: {}", e)))?;

        let mut kube_config = kube::Config::new(cluster_url);
        kube_config.default_namespace = config.namespace.clone();
        kube_config.accept_invalid_certs = config.accept_invalid_certs;

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ClusterError::Client(format!("invalid token: {}", e)))?;
            value.set_sensitive(true);
            kube_config.headers.push((AUTHORIZATION, value));
        }

        let client =
            Client::try_from(kube_config).map_err(|e| ClusterError::Client(e.to_string()))?;

        Ok(Self {
            client,
            namespace: config.namespace.clone(),
        })
    }
}

#[async_trait]
impl PodLister for KubePodLister {
    async fn list_pod_names(&self) -> Result<Vec<String>, ClusterError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), &self.namespace);
        let list = pods
            .list(&ListParams::default())
            .await
            .map_err(|e| ClusterError::List(e.to_string()))?;

        Ok(list.items.iter().map(|pod| pod.name_any()).collect())
    }
}

/// Used when the kube client could not be built at startup
///
/// Every request reports the construction error.
pub struct UnavailablePodLister {
    reason: String,
}

impl UnavailablePodLister {
    pub fn new(error: ClusterError) -> Self {
        let reason = match error {
            ClusterError::Client(reason) | ClusterError::List(reason) => reason,
        };
        Self { reason }
    }
}

#[async_trait]
impl PodLister for UnavailablePodLister {
    async fn list_pod_names(&self) -> Result<Vec<String>, ClusterError> {
        Err(ClusterError::Client(self.reason.clone()))
    }
}
