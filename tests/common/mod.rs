//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use nal_test_server::config::StreamerConfig;
use nal_test_server::net::{Listener, ListenerError};
use nal_test_server::{ServeReport, Shutdown, StreamServer};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

/// Upper bound on any single wait in these tests.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RunningServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<ServeReport, ListenerError>>,
}

impl RunningServer {
    /// Trigger shutdown and wait for `run` to return.
    pub async fn stop(self) -> ServeReport {
        self.shutdown.trigger();
        tokio::time::timeout(TEST_TIMEOUT, self.handle)
            .await
            .expect("server did not stop in time")
            .expect("server task panicked")
            .expect("server returned an error")
    }
}

/// Loopback config on an ephemeral port with a fast cadence.
pub fn test_config() -> StreamerConfig {
    let mut config = StreamerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.stream.frame_rate = 200;
    config.stream.header_gap_ms = 1;
    config
}

/// Bind and spawn a server.
pub async fn start_server(config: StreamerConfig) -> RunningServer {
    let listener = Listener::bind(&config.listener).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = StreamServer::new(config);
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    RunningServer {
        addr,
        shutdown,
        handle,
    }
}

/// Connect and read exactly `len` bytes.
pub async fn read_prefix(addr: SocketAddr, len: usize) -> (TcpStream, Vec<u8>) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let mut buf = vec![0u8; len];
    tokio::time::timeout(TEST_TIMEOUT, stream.read_exact(&mut buf))
        .await
        .expect("timed out reading from server")
        .unwrap();
    (stream, buf)
}
