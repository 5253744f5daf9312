//! Process configuration from environment variables
//!
//! Required:
//! - `PORT` - application server port
//! - `DIAG_PORT` - diagnostics server port
//!
//! Optional:
//! - `SHUTDOWN_GRACE_SECS` - per-server shutdown grace period (default 5)
//! - `K8S_API_URL`, `K8S_TOKEN`, `K8S_NAMESPACE`, `K8S_INSECURE` - cluster
//!   used by the application's hello handler

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_K8S_API_URL: &str = "https://kubernetes.default.svc";
pub const DEFAULT_K8S_NAMESPACE: &str = "default";
pub const DEFAULT_GRACE_SECS: u64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("The {what} should be set ({var})")]
    Missing { var: &'static str, what: &'static str },

    #[error("Invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Connection settings for the Kubernetes API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub namespace: String,
    pub accept_invalid_certs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub app_port: String,
    pub diag_port: String,
    pub shutdown_grace: Duration,
    pub cluster: ClusterConfig,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let app_port = non_empty("PORT").ok_or(ConfigError::Missing {
            var: "PORT",
            what: "application port",
        })?;
        let diag_port = non_empty("DIAG_PORT").ok_or(ConfigError::Missing {
            var: "DIAG_PORT",
            what: "diagnostics port",
        })?;

        let shutdown_grace = match non_empty("SHUTDOWN_GRACE_SECS") {
            Some(value) => {
                let secs = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::Invalid {
                        var: "SHUTDOWN_GRACE_SECS",
                        value: value.clone(),
                        reason: e.to_string(),
                    })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_GRACE_SECS),
        };

        let cluster = ClusterConfig {
            api_url: non_empty("K8S_API_URL").unwrap_or_else(|| DEFAULT_K8S_API_URL.to_string()),
            token: non_empty("K8S_TOKEN"),
            namespace: non_empty("K8S_NAMESPACE")
                .unwrap_or_else(|| DEFAULT_K8S_NAMESPACE.to_string()),
            accept_invalid_certs: non_empty("K8S_INSECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        };

        Ok(Self {
            app_port,
            diag_port,
            shutdown_grace,
            cluster,
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
