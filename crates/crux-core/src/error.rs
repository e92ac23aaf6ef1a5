//! Error types for crux.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the whole crux workspace.
///
/// The first four variants are the failures a caller of the route set
/// manager can observe. The remaining variants come from storage and
/// configuration code and are converted into one of the first four at the
/// manager boundary.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CruxError {
    /// A mutating operation was attempted with no signed-in user.
    #[error("Not authenticated: no active user session")]
    NotAuthenticated,

    /// Loading a collection from the remote store failed.
    #[error("Failed to load {collection}: {message}")]
    RemoteLoadFailed { collection: String, message: String },

    /// Writing to (or deleting from) the remote store failed.
    #[error("Failed to write {collection}: {message}")]
    RemoteWriteFailed { collection: String, message: String },

    /// One or more deletions failed while removing all user data.
    #[error("Failed to delete user data ({} failures)", .0.len())]
    AggregateDeleteFailed(Vec<CruxError>),

    /// A route or document the caller asked for by id does not exist.
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound { entity_type: String, id: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Data access error (repository/storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CruxError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Wraps a storage failure that happened while loading `collection`.
    pub fn remote_load(collection: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::RemoteLoadFailed {
            collection: collection.into(),
            message: source.to_string(),
        }
    }

    /// Wraps a storage failure that happened while writing `collection`.
    pub fn remote_write(collection: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::RemoteWriteFailed {
            collection: collection.into(),
            message: source.to_string(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
    }

    pub fn is_remote_load(&self) -> bool {
        matches!(self, Self::RemoteLoadFailed { .. })
    }

    pub fn is_remote_write(&self) -> bool {
        matches!(self, Self::RemoteWriteFailed { .. })
    }

    pub fn is_aggregate_delete(&self) -> bool {
        matches!(self, Self::AggregateDeleteFailed(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the wrapped failures of an `AggregateDeleteFailed`, or an
    /// empty slice for every other variant.
    pub fn sub_failures(&self) -> &[CruxError] {
        match self {
            Self::AggregateDeleteFailed(failures) => failures,
            _ => &[],
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for CruxError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CruxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for CruxError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for CruxError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, CruxError>`.
pub type Result<T> = std::result::Result<T, CruxError>;
