//! Core error types for topicfocus-core.
//!
//! Errors are grouped by the boundary they come from: authentication,
//! durable storage, input validation and configuration. Everything that
//! crosses the focus-surface boundary is wrapped in [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for topicfocus-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// No authenticated identity
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Durable storage read/write failures
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input refused before touching storage
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The focus surface task has already shut down
    #[error("Focus surface is closed")]
    SurfaceClosed,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Authentication errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Nobody is signed in
    #[error("No authenticated user")]
    NotAuthenticated,

    /// The identity store could not be read
    #[error("Failed to resolve current user: {0}")]
    Lookup(String),
}

/// Storage-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backing tables do not exist yet
    #[error("Storage is not provisioned: {0}")]
    NotProvisioned(String),

    /// Failed to open the store
    #[error("Failed to open store at {path}: {message}")]
    Open { path: PathBuf, message: String },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// The store refused or dropped the request
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required identifier was empty
    #[error("Missing required identifier: {0}")]
    MissingIdentifier(&'static str),

    /// Block id is not part of the document
    #[error("Unknown block id: {0}")]
    UnknownBlock(u64),

    /// Durations cannot change while the timer runs
    #[error("Timer settings cannot change while the timer is running")]
    TimerRunning,

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home/config directory could not be resolved
    #[error("Cannot determine data directory: {0}")]
    DataDir(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, msg) => {
                let detail = msg.clone().unwrap_or_else(|| code.to_string());
                if detail.contains("no such table") {
                    StorageError::NotProvisioned(detail)
                } else if code.code == rusqlite::ErrorCode::DatabaseLocked
                    || code.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StorageError::Unavailable(detail)
                } else {
                    StorageError::QueryFailed(detail)
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_table_maps_to_not_provisioned() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = conn
            .execute("INSERT INTO topic_progress (notes) VALUES ('x')", [])
            .unwrap_err();
        assert!(matches!(
            StorageError::from(err),
            StorageError::NotProvisioned(_)
        ));
    }

    #[test]
    fn core_error_wraps_sources() {
        let err: CoreError = AuthError::NotAuthenticated.into();
        assert_eq!(
            err.to_string(),
            "Authentication error: No authenticated user"
        );
        let err: CoreError = ValidationError::MissingIdentifier("topic_id").into();
        assert!(err.to_string().contains("topic_id"));
    }
}
