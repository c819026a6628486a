//! Error types for the patrol system

use thiserror::Error;

/// Patrol system errors
#[derive(Debug, Error, PartialEq)]
pub enum PatrolError {
    /// Invalid configuration
    #[error("Invalid patrol configuration: {0}")]
    InvalidConfig(String),

    /// Agent not found in the world
    #[error("Patrol agent not found: {0:?}")]
    AgentNotFound(crate::world::AgentId),
}

/// Result type for patrol operations
pub type Result<T> = std::result::Result<T, PatrolError>;
