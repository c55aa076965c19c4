//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use throttle_service::clock::{Clock, MonotonicClock};
use throttle_service::{ApiServer, ServiceConfig, Shutdown};
use tokio::net::TcpListener;

/// Boot the real server on an ephemeral loopback port.
pub async fn spawn_server(config: ServiceConfig) -> (SocketAddr, Shutdown) {
    spawn_server_with_clock(config, Arc::new(MonotonicClock)).await
}

/// Boot the real server with a caller-controlled clock.
pub async fn spawn_server_with_clock(
    config: ServiceConfig,
    clock: Arc<dyn Clock>,
) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = ApiServer::with_clock(config, clock);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// HTTP client without connection pooling or proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Parse the `X-Process-Time` header of a response.
pub fn process_time(res: &reqwest::Response) -> f64 {
    res.headers()
        .get("x-process-time")
        .expect("missing X-Process-Time header")
        .to_str()
        .unwrap()
        .parse()
        .unwrap()
}
