//! Path parameter validation stage.
//!
//! Runs on matched routes ahead of the limiter, so a malformed parameter
//! is answered with 422 and never spends quota.

use axum::{
    body::Body,
    extract::RawPathParams,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::value::RawValue;

use crate::http::error::ApiError;

/// Path parameters that must be integers.
pub const INTEGER_PARAMS: [&str; 1] = ["item_id"];

/// Parse an integer of any size into its canonical JSON form.
///
/// Accepts an optional sign followed by ASCII digits; leading zeros and a
/// `+` sign are dropped, and `-0` becomes `0`.
pub fn parse_integer(raw: &str) -> Option<Box<RawValue>> {
    let (negative, digits) = match raw.as_bytes().first()? {
        b'-' => (true, &raw[1..]),
        b'+' => (false, &raw[1..]),
        _ => (false, raw),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = digits.trim_start_matches('0');
    let canonical = match (negative, digits.is_empty()) {
        (_, true) => "0".to_string(),
        (true, false) => format!("-{digits}"),
        (false, false) => digits.to_string(),
    };
    RawValue::from_string(canonical).ok()
}

pub async fn validate_path_params(
    params: RawPathParams,
    request: Request<Body>,
    next: Next,
) -> Response {
    for (name, value) in &params {
        let Some(param) = INTEGER_PARAMS.iter().find(|p| **p == name) else {
            continue;
        };
        if parse_integer(value).is_none() {
            return ApiError::invalid_integer(*param, value).into_response();
        }
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(raw: &str) -> Option<String> {
        parse_integer(raw).map(|v| v.get().to_string())
    }

    #[test]
    fn test_parse_integer_canonical_forms() {
        assert_eq!(canonical("42").as_deref(), Some("42"));
        assert_eq!(canonical("-7").as_deref(), Some("-7"));
        assert_eq!(canonical("+007").as_deref(), Some("7"));
        assert_eq!(canonical("-000").as_deref(), Some("0"));
        assert_eq!(
            canonical("99999999999999999999").as_deref(),
            Some("99999999999999999999")
        );
    }

    #[test]
    fn test_parse_integer_rejects_non_integers() {
        for raw in ["", "-", "abc", "4.2", "1e3", " 1", "12a"] {
            assert!(parse_integer(raw).is_none(), "{raw:?} should be rejected");
        }
    }
}
