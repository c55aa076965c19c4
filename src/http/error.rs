//! Error taxonomy for the HTTP surface.
//!
//! Every variant is converted to a structured JSON response at the
//! boundary; nothing here ever aborts the process.

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::security::rule::RateLimitRule;

/// Body detail returned with every 429.
pub const RATE_LIMIT_DETAIL: &str = "Too many requests, please slow down!";

const INT_PARSING_MSG: &str = "Input should be a valid integer, unable to parse string as an integer";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("rate limit exceeded: {limit}")]
    RateLimitExceeded {
        limit: RateLimitRule,
        retry_after: Duration,
    },

    #[error("invalid path parameter `{param}`: {input:?}")]
    Validation { param: &'static str, input: String },

    #[error("not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn invalid_integer(param: &'static str, input: impl Into<String>) -> Self {
        ApiError::Validation {
            param,
            input: input.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::RateLimitExceeded { retry_after, .. } => {
                let mut response = (status, Json(json!({ "detail": RATE_LIMIT_DETAIL }))).into_response();
                // Round up so clients never retry inside the window.
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(secs));
                response
            }
            ApiError::Validation { param, input } => {
                let body = json!({
                    "detail": [{
                        "type": "int_parsing",
                        "loc": ["path", param],
                        "msg": INT_PARSING_MSG,
                        "input": input,
                    }]
                });
                (status, Json(body)).into_response()
            }
            ApiError::NotFound => (status, Json(json!({ "detail": "Not Found" }))).into_response(),
            ApiError::MethodNotAllowed => {
                (status, Json(json!({ "detail": "Method Not Allowed" }))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_rate_limit_response() {
        let response = ApiError::RateLimitExceeded {
            limit: RateLimitRule::per_minute(2),
            retry_after: Duration::from_millis(12_300),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "13");
        assert_eq!(body_json(response).await, json!({ "detail": RATE_LIMIT_DETAIL }));
    }

    #[tokio::test]
    async fn test_validation_response_names_the_parameter() {
        let response = ApiError::invalid_integer("item_id", "abc").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["detail"][0]["loc"], json!(["path", "item_id"]));
        assert_eq!(body["detail"][0]["input"], "abc");
        assert_eq!(body["detail"][0]["type"], "int_parsing");
    }
}
