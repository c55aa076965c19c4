//! Request admission subsystem.
//!
//! # Data Flow
//! ```text
//! Matched request (route template, peer address)
//!     → policy.rs (route → rule, or exempt)
//!     → limiter.rs (atomic check-and-increment per client/route)
//!     → rate_limit.rs (admit → handler, reject → 429)
//!
//! Background:
//!     sweeper.rs → limiter.rs (evict expired windows)
//! ```
//!
//! # Design Decisions
//! - Limiter state is an explicit object owned by the server, never global
//! - Per-route rules come from a table, not from handler annotations
//! - Fail closed: a request over quota never reaches its handler

pub mod limiter;
pub mod policy;
pub mod rate_limit;
pub mod rule;
pub mod sweeper;

pub use limiter::{Decision, RateLimiter};
pub use policy::{RouteLimit, RoutePolicy};
pub use rule::{RateLimitRule, RuleParseError};
