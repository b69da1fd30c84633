//! Accept loop.
//!
//! # Responsibilities
//! - Serve exactly one client at a time
//! - Report a disconnect and go back to waiting
//! - Log any other per-client failure and keep going
//! - Stop on the shutdown signal, closing the current client first

use tokio::io::AsyncWriteExt;
use tokio::sync::broadcast;
use tracing::Instrument;

use crate::config::StreamerConfig;
use crate::net::{ClientConnection, Listener, ListenerError};
use crate::stream::{FrameStreamer, StreamOutcome};

/// Totals for one `run`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeReport {
    pub clients_served: u64,
    pub frames_sent: u64,
}

/// How a single client session ended.
enum SessionEnd {
    Closed { frames_sent: u64 },
    Interrupted { frames_sent: u64 },
}

/// The test stream server.
pub struct StreamServer {
    streamer: FrameStreamer,
}

impl StreamServer {
    pub fn new(config: StreamerConfig) -> Self {
        Self {
            streamer: FrameStreamer::new(&config.stream),
        }
    }

    /// Accept and stream to clients until `shutdown` fires.
    ///
    /// The listener is dropped on return, releasing the port.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<ServeReport, ListenerError> {
        let mut report = ServeReport::default();
        tracing::info!("Waiting for a client to connect");

        loop {
            let connection = tokio::select! {
                accepted = listener.accept() => accepted?,
                _ = shutdown.recv() => {
                    tracing::info!("Shutting down server");
                    break;
                }
            };

            let span = tracing::info_span!(
                "client",
                connection_id = %connection.id(),
                peer = %connection.peer_addr()
            );
            let end = self
                .serve_client(connection, &mut shutdown)
                .instrument(span)
                .await;

            report.clients_served += 1;
            match end {
                SessionEnd::Closed { frames_sent } => {
                    report.frames_sent += frames_sent;
                    tracing::info!("Waiting for next connection");
                }
                SessionEnd::Interrupted { frames_sent } => {
                    report.frames_sent += frames_sent;
                    tracing::info!("Shutting down server");
                    break;
                }
            }
        }

        drop(listener);
        tracing::info!(
            clients_served = report.clients_served,
            frames_sent = report.frames_sent,
            "Server stopped"
        );
        Ok(report)
    }

    async fn serve_client(
        &self,
        mut connection: ClientConnection,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> SessionEnd {
        tracing::info!("Client connected");

        let result = self.streamer.stream(connection.stream_mut(), shutdown).await;

        let end = match result {
            Ok(StreamOutcome::ClientDisconnected { frames_sent }) => {
                tracing::info!(frames_sent, "Client disconnected");
                SessionEnd::Closed { frames_sent }
            }
            Ok(StreamOutcome::Interrupted { frames_sent }) => {
                tracing::info!(frames_sent, "Stopping stream");
                SessionEnd::Interrupted { frames_sent }
            }
            Err(e) => {
                tracing::error!(error = %e, "Stream error");
                SessionEnd::Closed {
                    frames_sent: e.frames_sent(),
                }
            }
        };

        if let Err(e) = connection.stream_mut().shutdown().await {
            tracing::debug!(error = %e, "Socket shutdown failed");
        }
        tracing::info!(
            elapsed_ms = connection.elapsed().as_millis() as u64,
            "Connection closed"
        );
        end
    }
}
