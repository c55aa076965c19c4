//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (trace, request id layers)
//!     → timing.rs (start clock)
//!     → server.rs (timeout layer, 408)
//!     → router (match route template, else 404/405 fallback)
//!     → params.rs (integer path params, else 422)
//!     → security::rate_limit (admit or 429)
//!     → handlers.rs (build JSON payload)
//!     → timing.rs (stamp X-Process-Time)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod params;
pub mod server;
pub mod timing;

pub use error::ApiError;
pub use server::{ApiServer, AppState};
