//! Error types for the export engine.

use reactor_source::SourceError;
use reactor_types::SettingsError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can occur while exporting a property.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A required identifier or option is missing. Raised before any I/O.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Fetching from the remote source failed.
    #[error("remote source error: {0}")]
    Source(#[from] SourceError),

    /// A filesystem operation failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The entity id cannot be used as a directory name.
    #[error("entity id {0:?} is not a valid directory name")]
    InvalidEntityId(String),

    /// A symlink, usually another entity's alias, sits where a directory
    /// must be created.
    #[error("{} is an alias link, not a directory", path.display())]
    LinkCollision { path: PathBuf },

    /// The entity's settings could not be decoded.
    #[error("settings of {entity_id} could not be decoded: {source}")]
    Settings {
        entity_id: String,
        #[source]
        source: SettingsError,
    },

    /// The entity's delegate descriptor is not declared by its extension package.
    #[error("descriptor {descriptor_id} of {entity_id} not found in extension package {package_id}")]
    MissingDescriptor {
        entity_id: String,
        package_id: String,
        descriptor_id: String,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}
