//! Helpers shared by the server tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use super::ServerDescriptor;
use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Router answering `GET /` with "OK"
pub fn ok_router() -> Router {
    Router::new().route("/", get(|| async { "OK" }))
}

/// Router whose `/slow` handler notifies `entered`, then sleeps for `delay`
pub fn slow_router(entered: Arc<Notify>, delay: Duration) -> Router {
    Router::new().route(
        "/slow",
        get(move || {
            let entered = entered.clone();
            async move {
                entered.notify_one();
                tokio::time::sleep(delay).await;
                "done"
            }
        }),
    )
}

/// Descriptor listening on an ephemeral loopback port
pub fn loopback(name: &str, router: Router) -> ServerDescriptor {
    ServerDescriptor::new(name, "127.0.0.1:0", router)
}

/// A listening socket that keeps its port busy, and that port's address
pub fn occupied_address() -> (std::net::TcpListener, String) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind blocker");
    let address = listener.local_addr().expect("Failed to read addr").to_string();
    (listener, address)
}

/// A port that was free a moment ago
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind placeholder listener");
    listener.local_addr().expect("Failed to read addr").port()
}

/// HTTP client that never reuses connections
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to build client")
}

/// Wait for server to be ready with retry logic
///
/// Retries connection up to max_retries times with exponential backoff.
pub async fn wait_for_server(url: &str, max_retries: u32) -> reqwest::Client {
    let client = client();
    let mut delay = Duration::from_millis(10);

    for attempt in 1..=max_retries {
        match client
            .get(url)
            .timeout(Duration::from_millis(100))
            .send()
            .await
        {
            Ok(_) => return client,
            Err(_) if attempt < max_retries => {
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, Duration::from_millis(200));
            }
            Err(e) => panic!("Server not ready after {} attempts: {}", max_retries, e),
        }
    }
    client
}

/// Whether a TCP connection to `addr` is refused
pub async fn is_refused(addr: std::net::SocketAddr) -> bool {
    tokio::net::TcpStream::connect(addr).await.is_err()
}
