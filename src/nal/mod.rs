//! Canned H.264 payloads.
//!
//! # Data Flow
//! ```text
//! frame counter
//!     → schedule.rs (IDR or P-frame, log or not)
//!     → units.rs (fixed start-code-prefixed bytes)
//!     → stream::FrameStreamer (writes them to the socket)
//!
//! annexb.rs splits a received buffer back into units (receiver side).
//! ```

pub mod annexb;
pub mod schedule;
pub mod units;

pub use annexb::{split_annexb, NalAccumulator};
pub use schedule::FrameSchedule;
pub use units::{NalType, NalUnit, IDR, PPS, P_FRAME, SPS, START_CODE};
