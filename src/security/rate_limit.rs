//! Limiter stage of the dispatch pipeline.
//!
//! Installed as a route layer, so it only runs for matched routes and
//! sees the route template rather than the concrete path.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, MatchedPath, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::limiter::Decision;

/// Key used when the peer address is unknown (in-process calls).
pub const FALLBACK_CLIENT_KEY: &str = "127.0.0.1";

/// Client key for a request: the peer IP address.
pub fn client_key(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| FALLBACK_CLIENT_KEY.to_string())
}

/// Middleware function for per-route rate limiting.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let route = match request.extensions().get::<MatchedPath>() {
        Some(path) => path.as_str().to_string(),
        None => request.uri().path().to_string(),
    };

    let Some(rule) = state.policy.resolve(&route) else {
        return next.run(request).await;
    };

    let key = client_key(&request);
    match state.limiter.check(&key, &route, rule) {
        Decision::Admit { remaining } => {
            tracing::trace!(client = %key, route = %route, remaining, "Request admitted");
            next.run(request).await
        }
        Decision::Reject { limit, retry_after } => {
            tracing::warn!(client = %key, route = %route, limit = %limit, "Rate limit exceeded");
            metrics::record_rate_limited(&route);
            ApiError::RateLimitExceeded { limit, retry_after }.into_response()
        }
    }
}
