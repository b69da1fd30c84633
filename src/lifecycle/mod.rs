//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → accept loop stops waiting → current client closed
//!             → listener dropped → process exits
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
