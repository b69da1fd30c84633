//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind with SO_REUSEADDR, accept)
//!     → connection.rs (id, peer address, accept time)
//!     → Hand off to the send loop
//! ```
//!
//! # Design Decisions
//! - Backlog defaults to 1; a second client waits until the first closes
//! - No TLS; the receiver reads plain TCP through `adb reverse`

pub mod connection;
pub mod listener;

pub use connection::{ClientConnection, ConnectionId};
pub use listener::{Listener, ListenerError};
