//! Timing stage: stamps every response with its processing time.
//!
//! Sits outside the router so successes, rejections and fall-backs all
//! carry the header.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::http::server::AppState;
use crate::observability::metrics;

/// Elapsed handling time in seconds, as a decimal string.
pub const X_PROCESS_TIME: HeaderName = HeaderName::from_static("x-process-time");

pub async fn process_time_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let started = state.clock.now();
    let method = request.method().clone();

    let mut response = next.run(request).await;

    let elapsed = state.clock.now().saturating_duration_since(started);
    let value = format!("{}", elapsed.as_secs_f64());
    if let Ok(value) = HeaderValue::from_str(&value) {
        response.headers_mut().insert(X_PROCESS_TIME, value);
    }

    metrics::record_request(method.as_str(), response.status().as_u16(), elapsed);
    response
}
