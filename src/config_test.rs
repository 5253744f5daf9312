//! Tests for environment configuration

use super::*;
use std::collections::HashMap;

fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    let map: HashMap<&str, &str> = vars.iter().copied().collect();
    move |var| map.get(var).map(|v| v.to_string())
}

#[test]
fn test_both_ports_set() {
    let config = Config::from_lookup(lookup(&[("PORT", "8080"), ("DIAG_PORT", "8081")])).unwrap();

    assert_eq!(config.app_port, "8080");
    assert_eq!(config.diag_port, "8081");
    assert_eq!(config.shutdown_grace, Duration::from_secs(DEFAULT_GRACE_SECS));
}

#[test]
fn test_missing_app_port_is_fatal() {
    let err = Config::from_lookup(lookup(&[("DIAG_PORT", "8081")])).unwrap_err();

    assert_eq!(
        err,
        ConfigError::Missing {
            var: "PORT",
            what: "application port"
        }
    );
    assert_eq!(err.to_string(), "The application port should be set (PORT)");
}

#[test]
fn test_missing_diag_port_is_fatal() {
    let err = Config::from_lookup(lookup(&[("PORT", "8080")])).unwrap_err();

    assert!(matches!(err, ConfigError::Missing { var: "DIAG_PORT", .. }));
}

#[test]
fn test_empty_port_counts_as_missing() {
    let err = Config::from_lookup(lookup(&[("PORT", ""), ("DIAG_PORT", "8081")])).unwrap_err();

    assert!(matches!(err, ConfigError::Missing { var: "PORT", .. }));
}

#[test]
fn test_grace_period_override() {
    let config = Config::from_lookup(lookup(&[
        ("PORT", "8080"),
        ("DIAG_PORT", "8081"),
        ("SHUTDOWN_GRACE_SECS", "12"),
    ]))
    .unwrap();

    assert_eq!(config.shutdown_grace, Duration::from_secs(12));
}

#[test]
fn test_invalid_grace_period_is_rejected() {
    let err = Config::from_lookup(lookup(&[
        ("PORT", "8080"),
        ("DIAG_PORT", "8081"),
        ("SHUTDOWN_GRACE_SECS", "soon"),
    ]))
    .unwrap_err();

    assert!(matches!(
        err,
        ConfigError::Invalid {
            var: "SHUTDOWN_GRACE_SECS",
            ..
        }
    ));
}

#[test]
fn test_cluster_defaults() {
    let config = Config::from_lookup(lookup(&[("PORT", "8080"), ("DIAG_PORT", "8081")])).unwrap();

    assert_eq!(config.cluster.api_url, DEFAULT_K8S_API_URL);
    assert_eq!(config.cluster.namespace, DEFAULT_K8S_NAMESPACE);
    assert_eq!(config.cluster.token, None);
    assert!(config.cluster.accept_invalid_certs);
}

#[test]
fn test_cluster_overrides() {
    let config = Config::from_lookup(lookup(&[
        ("PORT", "8080"),
        ("DIAG_PORT", "8081"),
        ("K8S_API_URL", "https://master.example:443"),
        ("K8S_TOKEN", "secret"),
        ("K8S_NAMESPACE", "team-a"),
        ("K8S_INSECURE", "false"),
    ]))
    .unwrap();

    assert_eq!(config.cluster.api_url, "https://master.example:443");
    assert_eq!(config.cluster.token.as_deref(), Some("secret"));
    assert_eq!(config.cluster.namespace, "team-a");
    assert!(!config.cluster.accept_invalid_certs);
}
