//! TCP listener implementation.
//!
//! # Responsibilities
//! - Bind to the configured address with SO_REUSEADDR
//! - Accept incoming TCP connections one at a time
//! - Apply per-socket options to accepted clients

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::{TcpListener, TcpSocket};

use crate::config::ListenerConfig;
use crate::net::connection::ClientConnection;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Configured address does not parse.
    #[error("invalid bind address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Failed to bind to address.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Failed to accept connection.
    #[error("failed to accept: {0}")]
    Accept(#[source] std::io::Error),
}

/// A listening socket that hands out one client at a time.
#[derive(Debug)]
pub struct Listener {
    /// The underlying TCP listener.
    inner: TcpListener,
    /// Apply TCP_NODELAY to accepted sockets.
    nodelay: bool,
}

impl Listener {
    /// Bind to the configured address.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        let addr: SocketAddr =
            config
                .bind_address
                .parse()
                .map_err(|source| ListenerError::InvalidAddress {
                    address: config.bind_address.clone(),
                    source,
                })?;

        let bind_err = |source| ListenerError::Bind {
            address: addr,
            source,
        };

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(bind_err)?;

        socket
            .set_reuseaddr(config.reuse_address)
            .map_err(bind_err)?;
        socket.bind(addr).map_err(bind_err)?;
        let inner = socket.listen(config.backlog.max(1)).map_err(bind_err)?;

        let local_addr = inner.local_addr().map_err(bind_err)?;

        tracing::info!(
            address = %local_addr,
            backlog = config.backlog,
            "Listener bound"
        );

        Ok(Self {
            inner,
            nodelay: config.nodelay,
        })
    }

    /// Accept the next client.
    pub async fn accept(&self) -> Result<ClientConnection, ListenerError> {
        let (stream, addr) = self.inner.accept().await.map_err(ListenerError::Accept)?;

        if self.nodelay {
            if let Err(e) = stream.set_nodelay(true) {
                tracing::warn!(peer_addr = %addr, error = %e, "Failed to set TCP_NODELAY");
            }
        }

        tracing::debug!(peer_addr = %addr, "Connection accepted");

        Ok(ClientConnection::new(stream, addr))
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }
}
