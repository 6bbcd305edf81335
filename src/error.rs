//! Unified error types for the dice service.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the dice service.
///
/// Every variant is a startup failure; request handling has no error path.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Log file could not be prepared.
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        /// The configured log path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Listener could not bind.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address we tried to bind.
        addr: SocketAddr,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;
