//! Error types for graph persistence

use thiserror::Error;

/// Persistence errors
#[derive(Debug, Error)]
pub enum PersistError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Snapshot written by a newer format
    #[error("Version mismatch: snapshot version {0}, supported version {1}")]
    VersionMismatch(u32, u32),
}

/// Result type for persistence operations
pub type Result<T> = std::result::Result<T, PersistError>;
