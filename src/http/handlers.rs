//! Route handlers.
//!
//! Each handler is a pure mapping from path parameters to a JSON payload.
//! Rate limiting and timing happen around them in the dispatch pipeline.

use axum::{extract::Path, Json};
use serde::Serialize;
use serde_json::value::RawValue;

use crate::http::error::ApiError;
use crate::http::params::parse_integer;

pub const ROOT: &str = "/";
pub const ITEM: &str = "/items/{item_id}";
pub const STATUS: &str = "/status";

/// Every route template the service registers.
pub const ROUTES: [&str; 3] = [ROOT, ITEM, STATUS];

const WELCOME: &str = "Welcome to the FastAPI & SlowAPI MVP!";

#[derive(Debug, Serialize)]
pub struct Welcome {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Item {
    /// Canonical decimal form; ids are not bounded to a machine integer.
    pub item_id: Box<RawValue>,
}

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
}

pub async fn root() -> Json<Welcome> {
    Json(Welcome { message: WELCOME })
}

/// Echo the item id. Non-integer ids are a validation error.
pub async fn read_item(Path(raw): Path<String>) -> Result<Json<Item>, ApiError> {
    let item_id = parse_integer(&raw).ok_or_else(|| ApiError::invalid_integer("item_id", raw))?;
    Ok(Json(Item { item_id }))
}

pub async fn status() -> Json<Liveness> {
    Json(Liveness { status: "ok" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_item_echoes_integer() {
        let Json(item) = read_item(Path("42".to_string())).await.unwrap();
        assert_eq!(item.item_id.get(), "42");

        let Json(item) = read_item(Path("-7".to_string())).await.unwrap();
        assert_eq!(item.item_id.get(), "-7");

        let Json(item) = read_item(Path("123456789012345678901234".to_string())).await.unwrap();
        assert_eq!(item.item_id.get(), "123456789012345678901234");
    }

    #[tokio::test]
    async fn test_read_item_rejects_non_integer() {
        let err = read_item(Path("abc".to_string())).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { param: "item_id", .. }));
    }

    #[tokio::test]
    async fn test_fixed_payloads() {
        assert_eq!(root().await.0.message, WELCOME);
        assert_eq!(status().await.0.status, "ok");
    }
}
