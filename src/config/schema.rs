//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file reproduces the stock service.

use serde::{Deserialize, Serialize};

use crate::security::rule::RateLimitRule;

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Rule applied to every route without an entry in `routes`.
    pub default_limit: RateLimitRule,

    /// Per-route overrides, keyed by route template.
    pub routes: Vec<RouteLimitConfig>,

    /// How often idle counters are evicted, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_limit: RateLimitRule::per_minute(5),
            routes: vec![
                RouteLimitConfig::limited("/", RateLimitRule::per_minute(2)),
                RouteLimitConfig::limited("/items/{item_id}", RateLimitRule::per_minute(5)),
                RouteLimitConfig::exempt("/status"),
            ],
            sweep_interval_secs: 60,
        }
    }
}

/// Rate limit override for a single route.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteLimitConfig {
    /// Route template, e.g. "/items/{item_id}".
    pub path: String,

    /// Rule replacing the default for this route.
    #[serde(default)]
    pub limit: Option<RateLimitRule>,

    /// Never limit this route.
    #[serde(default)]
    pub exempt: bool,
}

impl RouteLimitConfig {
    pub fn limited(path: impl Into<String>, limit: RateLimitRule) -> Self {
        Self {
            path: path.into(),
            limit: Some(limit),
            exempt: false,
        }
    }

    pub fn exempt(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            limit: None,
            exempt: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
