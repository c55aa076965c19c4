//! Rate-limited JSON API library.

pub mod clock;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::ServiceConfig;
pub use http::ApiServer;
pub use lifecycle::Shutdown;
