//! H.264 NAL Test Stream Server
//!
//! Feeds canned H.264 NAL unit headers to one TCP client at a time so a
//! video receiver can be checked for basic socket reads.
//!
//! # Architecture Overview
//!
//! ```text
//!   receiver (adb reverse tcp:27183 tcp:27183)
//!        │
//!        ▼
//!   ┌──────────┐    ┌──────────┐    ┌──────────────┐
//!   │   net    │───▶│  server  │───▶│    stream    │── SPS, PPS, IDR/P @ 30 Hz
//!   │ listener │    │ accept   │    │ FrameStreamer│
//!   └──────────┘    │  loop    │    └──────┬───────┘
//!                   └────▲─────┘           │
//!                        │                 ▼
//!                 ┌──────┴─────┐     ┌──────────┐
//!                 │ lifecycle  │     │   nal    │
//!                 │ SIGINT/TERM│     │ canned   │
//!                 └────────────┘     │  units   │
//!                                    └──────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use nal_test_server::config::{
    read_config, validate_config, ConfigError, ConfigOverrides, StreamerConfig,
};
use nal_test_server::lifecycle::{signals, Shutdown};
use nal_test_server::net::Listener;
use nal_test_server::observability::init_logging;
use nal_test_server::StreamServer;

#[derive(Parser)]
#[command(name = "nal-test-server")]
#[command(about = "Streams canned H.264 NAL units to one TCP client at a time", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file.
    #[arg(short, long)]
    bind: Option<String>,

    /// Frames per second, overrides the config file.
    #[arg(long)]
    fps: Option<u32>,

    /// Log level when RUST_LOG is unset.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// File (or defaults) with CLI overrides applied. Not yet validated.
    fn into_config(self) -> Result<StreamerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => StreamerConfig::default(),
        };

        ConfigOverrides {
            bind_address: self.bind,
            frame_rate: self.fps,
            log_level: self.log_level,
        }
        .apply(&mut config);

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let fallback_level = cli.log_level.clone().unwrap_or_else(|| "info".to_string());

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            init_logging(&fallback_level);
            tracing::error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    init_logging(&config.observability.log_level);

    if let Err(errors) = validate_config(&config) {
        for e in &errors {
            tracing::error!(error = %e, "Invalid configuration");
        }
        return Err(ConfigError::Validation(errors).into());
    }

    tracing::info!("nal-test-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        frame_rate = config.stream.frame_rate,
        idr_interval = config.stream.idr_interval,
        "Configuration loaded"
    );

    let listener = Listener::bind(&config.listener).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "TCP server listening");
    tracing::info!(
        "Make sure to run: adb reverse tcp:{port} tcp:{port}",
        port = local_addr.port()
    );
    tracing::info!("Press Ctrl+C to stop");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown.clone());

    let server = StreamServer::new(config);
    match server.run(listener, server_shutdown).await {
        Ok(_) => {
            tracing::info!("Shutdown complete");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Server error");
            Err(e.into())
        }
    }
}
