//! Send loop for one connected client.
//!
//! # Data Flow
//! ```text
//! SPS ─ gap ─ PPS ─ gap ─┬─ tick → IDR or P-frame → log progress ─┐
//!                        └─────────────────────────────────────────┘
//! ends on: peer disconnect | shutdown signal | other write error
//! ```

pub mod sender;

pub use sender::{FrameStreamer, StreamError, StreamOutcome};
