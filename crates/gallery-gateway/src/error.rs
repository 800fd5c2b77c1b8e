//! Error types for the gateway
//!
//! - [`GatewayError`]: startup failures (config, image root, bind)
//! - [`ResolveError`]: why a requested filename produced no file
//! - [`TelemetryError`]: access-event delivery failures, logged only

use std::net::SocketAddr;
use std::path::PathBuf;

/// Startup and configuration errors
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error on a configured path
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Listener could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: warp::Error,
    },
}

impl GatewayError {
    /// Create config error
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Filename resolution failures
///
/// Every variant is answered with the same 404 body.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Name is not a plain file name or escapes the image root
    #[error("rejected filename: {0:?}")]
    Rejected(String),

    /// No such file
    #[error("image not found: {0}")]
    NotFound(String),

    /// Filesystem error while opening
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    /// Whether the name was refused rather than simply missing
    #[inline]
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Access-event delivery errors
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Network, timeout or serialization failure
    #[error("webhook transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Webhook answered with a non-success status
    #[error("webhook responded with status {0}")]
    Status(u16),
}
