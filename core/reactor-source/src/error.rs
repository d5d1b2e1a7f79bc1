//! Error types for remote data sources.

use thiserror::Error;

/// Result type for remote source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors that can occur while fetching from a remote source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport failure (connection, timeout, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    /// The requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SourceError {
    /// Returns true if the remote reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            SourceError::NotFound(_) => true,
            SourceError::Api { status, .. } => *status == 404,
            _ => false,
        }
    }
}
