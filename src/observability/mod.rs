//! Observability subsystem.
//!
//! Console output is structured `tracing` events; the per-client span
//! carries the connection id and peer address.

pub mod logging;

pub use logging::init_logging;
