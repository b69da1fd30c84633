//! Configuration validation.
//!
//! Serde handles syntax; this checks value ranges. All problems are
//! collected so a bad file is reported in one go.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::StreamerConfig;

/// Upper bound on the send cadence.
pub const MAX_FRAME_RATE: u32 = 1000;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("listener.backlog must be at least 1")]
    ZeroBacklog,

    #[error("stream.frame_rate must be between 1 and {max}, got {0}", max = MAX_FRAME_RATE)]
    FrameRateOutOfRange(u32),

    #[error("stream.idr_interval must be at least 1")]
    ZeroIdrInterval,

    #[error("stream.progress_interval must be at least 1")]
    ZeroProgressInterval,

    #[error("observability.log_level {0:?} is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &StreamerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.backlog == 0 {
        errors.push(ValidationError::ZeroBacklog);
    }

    let fps = config.stream.frame_rate;
    if fps == 0 || fps > MAX_FRAME_RATE {
        errors.push(ValidationError::FrameRateOutOfRange(fps));
    }
    if config.stream.idr_interval == 0 {
        errors.push(ValidationError::ZeroIdrInterval);
    }
    if config.stream.progress_interval == 0 {
        errors.push(ValidationError::ZeroProgressInterval);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
