//! Startup error types
//!
//! Failures that abort server startup. Everything past a successful bind is
//! handled locally by the accept loops and never propagates here.

use std::net::SocketAddr;
use thiserror::Error;

/// Fatal errors returned from `HttpServer::start`
#[derive(Debug, Error)]
pub enum StartupError {
    /// A configured listen prefix could not be parsed
    #[error("invalid listen prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    /// Binding a parsed prefix failed (port in use, insufficient privilege)
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// TLS material is missing or unreadable
    #[error("TLS configuration error: {0}")]
    TlsConfig(String),

    /// rustls rejected the assembled server configuration
    #[error("TLS setup rejected: {0}")]
    Tls(#[from] tokio_rustls::rustls::Error),
}
