//! Tests for starting the process from configuration

use super::*;
use crate::server::test_support::{free_port, is_refused, wait_for_server};
use crate::server::{ShutdownTrigger, StopOutcome};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::oneshot;

fn lookup(vars: HashMap<&'static str, String>) -> impl Fn(&str) -> Option<String> {
    move |var| vars.get(var).cloned()
}

/// Missing PORT fails before the diagnostics port is ever bound
#[tokio::test]
async fn test_missing_port_exits_before_any_server_starts() {
    // ARRANGE
    let diag_port = free_port();
    let vars = HashMap::from([("DIAG_PORT", diag_port.to_string())]);

    // ACT
    let result = tokio::time::timeout(
        Duration::from_secs(1),
        run(lookup(vars), std::future::pending()),
    )
    .await
    .expect("A configuration error should return immediately");

    // ASSERT
    assert!(matches!(
        result,
        Err(ConfigError::Missing { var: "PORT", .. })
    ));
    assert!(is_refused(SocketAddr::from(([127, 0, 0, 1], diag_port))).await);
}

#[tokio::test]
async fn test_missing_diag_port_exits_before_any_server_starts() {
    let app_port = free_port();
    let vars = HashMap::from([("PORT", app_port.to_string())]);

    let result = run(lookup(vars), std::future::pending()).await;

    assert!(matches!(
        result,
        Err(ConfigError::Missing {
            var: "DIAG_PORT",
            ..
        })
    ));
    assert!(is_refused(SocketAddr::from(([127, 0, 0, 1], app_port))).await);
}

/// PORT and DIAG_PORT set: healthz answers, interrupt stops both
#[tokio::test]
async fn test_configured_ports_serve_until_interrupt() {
    // ARRANGE
    let app_port = free_port();
    let diag_port = free_port();
    let vars = HashMap::from([
        ("PORT", app_port.to_string()),
        ("DIAG_PORT", diag_port.to_string()),
        ("SHUTDOWN_GRACE_SECS", "5".to_string()),
    ]);
    let (interrupt, rx) = oneshot::channel::<()>();
    let signal = async move {
        let _ = rx.await;
        TerminationSignal::Interrupt
    };
    let running = tokio::spawn(run(lookup(vars), signal));

    let healthz = format!("http://127.0.0.1:{}/healthz", diag_port);
    let client = wait_for_server(&healthz, 10).await;
    let response = client.get(&healthz).send().await.expect("healthz should answer");
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");

    // ACT
    interrupt.send(()).unwrap();
    let outcome = tokio::time::timeout(Duration::from_secs(6), running)
        .await
        .expect("Shutdown should finish within the grace period")
        .expect("Run task should not panic")
        .expect("Configuration is complete");

    // ASSERT
    assert!(matches!(
        outcome.trigger,
        ShutdownTrigger::Signal(TerminationSignal::Interrupt)
    ));
    assert_eq!(outcome.exit_status(), 0);
    for entry in &outcome.report.entries {
        assert!(matches!(entry.result, Ok(StopOutcome::Stopped)));
    }
    for port in [app_port, diag_port] {
        assert!(is_refused(SocketAddr::from(([127, 0, 0, 1], port))).await);
    }
}
