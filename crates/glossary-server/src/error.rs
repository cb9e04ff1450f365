//! Error types for the Glossary Server
//!
//! Request-level failures travel as `GlossaryError`; this type covers
//! startup and serving.

use glossary_core::GlossaryError;
use thiserror::Error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A listener could not be bound
    #[error("Failed to bind {addr}: {source}")]
    BindError {
        /// Address that was requested
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Backing store could not be reached or initialized
    #[error("State store error: {0}")]
    StateStoreError(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    InternalError(String),
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

impl From<GlossaryError> for ServerError {
    fn from(err: GlossaryError) -> Self {
        match err {
            GlossaryError::ConfigurationError(msg) => ServerError::ConfigError(msg),
            GlossaryError::StateStoreError(msg) => ServerError::StateStoreError(msg),
            other => ServerError::InternalError(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::InternalError(format!("IO error: {}", err))
    }
}
