//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init logging/metrics → Bind → Serve
//!
//! Shutdown (shutdown.rs):
//!     trigger() → broadcast → server drains in-flight, sweeper exits
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger_on_signal → trigger()
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
