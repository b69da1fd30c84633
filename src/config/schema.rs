//! Configuration schema definitions.
//!
//! Every section has defaults, so an empty file (or no file at all) yields
//! the stock loopback server on port 27183.

use serde::{Deserialize, Serialize};

/// Default address the Android receiver expects behind `adb reverse`.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:27183";

/// Root configuration for the test server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StreamerConfig {
    /// Listening socket settings.
    pub listener: ListenerConfig,

    /// Send loop cadence.
    pub stream: StreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:27183").
    pub bind_address: String,

    /// Set SO_REUSEADDR before binding.
    pub reuse_address: bool,

    /// Listen backlog. One client is served at a time.
    pub backlog: u32,

    /// Set TCP_NODELAY on accepted sockets.
    pub nodelay: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            reuse_address: true,
            backlog: 1,
            nodelay: true,
        }
    }
}

/// Send loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Frames written per second.
    pub frame_rate: u32,

    /// An IDR unit is sent every `idr_interval` frames, starting at frame 0.
    pub idr_interval: u32,

    /// Non-IDR frames are logged every `progress_interval` frames.
    pub progress_interval: u32,

    /// Pause after each parameter set, in milliseconds.
    pub header_gap_ms: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30,
            idr_interval: 30,
            progress_interval: 10,
            header_gap_ms: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_server() {
        let config = StreamerConfig::default();
        assert_eq!(config.listener.bind_address, "127.0.0.1:27183");
        assert_eq!(config.listener.backlog, 1);
        assert_eq!(config.stream.frame_rate, 30);
        assert_eq!(config.stream.idr_interval, 30);
        assert_eq!(config.stream.progress_interval, 10);
        assert_eq!(config.stream.header_gap_ms, 10);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config: StreamerConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let config: StreamerConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "0.0.0.0:9000"

            [stream]
            frame_rate = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:9000");
        assert!(config.listener.reuse_address);
        assert_eq!(config.stream.frame_rate, 60);
        assert_eq!(config.stream.idr_interval, 30);
    }
}
