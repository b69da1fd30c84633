//! H.264 NAL test stream server library.

pub mod config;
pub mod lifecycle;
pub mod nal;
pub mod net;
pub mod observability;
pub mod receiver;
pub mod server;
pub mod stream;

pub use config::StreamerConfig;
pub use lifecycle::Shutdown;
pub use server::{ServeReport, StreamServer};
