//! Route → rule table consulted before every handler call.
//!
//! # Design Decisions
//! - Built once at startup from config, immutable afterwards
//! - A per-route override replaces the global default; they never stack
//! - Exempt routes bypass the limiter entirely (health checks)

use std::collections::HashMap;

use crate::config::RateLimitConfig;
use crate::security::rule::RateLimitRule;

/// What applies to one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteLimit {
    Limited(RateLimitRule),
    Exempt,
}

/// Resolved rate limit table.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    enabled: bool,
    default_rule: RateLimitRule,
    routes: HashMap<String, RouteLimit>,
}

impl RoutePolicy {
    pub fn new(default_rule: RateLimitRule) -> Self {
        Self {
            enabled: true,
            default_rule,
            routes: HashMap::new(),
        }
    }

    /// Build the table from validated configuration.
    pub fn from_config(config: &RateLimitConfig) -> Self {
        let mut policy = Self::new(config.default_limit);
        policy.enabled = config.enabled;
        for route in &config.routes {
            let limit = match route.limit {
                Some(rule) if !route.exempt => RouteLimit::Limited(rule),
                _ => RouteLimit::Exempt,
            };
            policy.routes.insert(route.path.clone(), limit);
        }
        policy
    }

    /// Attach an override to `route`.
    pub fn with_route(mut self, route: impl Into<String>, limit: RouteLimit) -> Self {
        self.routes.insert(route.into(), limit);
        self
    }

    /// The rule that governs `route`, or `None` when it is not limited.
    pub fn resolve(&self, route: &str) -> Option<&RateLimitRule> {
        if !self.enabled {
            return None;
        }
        match self.routes.get(route) {
            Some(RouteLimit::Limited(rule)) => Some(rule),
            Some(RouteLimit::Exempt) => None,
            None => Some(&self.default_rule),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
