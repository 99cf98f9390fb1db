//! Error types for vault-core

use thiserror::Error;

/// Result type alias for vault-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the application shell
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The element the application is mounted into does not exist
    #[error("Mount point not found: #{0}")]
    MissingMountPoint(String),

    /// No route is declared for the path
    #[error("No route declared for path: {0}")]
    UnknownRoute(String),

    /// The route table is malformed
    #[error("Invalid route table: {0}")]
    InvalidRouteTable(String),

    /// The persistent key-value store rejected an operation
    #[error("Storage error: {0}")]
    Storage(String),

    /// Clearing the session failed part way; removed keys were put back
    #[error("Failed to clear session key '{key}': {reason} ({restored} key(s) restored)")]
    SessionClear {
        key: &'static str,
        reason: String,
        restored: usize,
    },

    /// Invalid shell configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}
