//! Error types for the coordinator

use thiserror::Error;

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, CoordinatorError>;

/// Main error type for the coordinator
#[derive(Error, Debug)]
pub enum CoordinatorError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Dispatch errors
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Completion channel errors
    #[error("Channel closed: {0}")]
    ChannelClosed(String),
}

impl CoordinatorError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a dispatch error
    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::Dispatch(message.into())
    }
}
