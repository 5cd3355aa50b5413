//! Core error types for worktrack-core.
//!
//! This module defines the error hierarchy using thiserror. Validation
//! failures carry an HTTP-style status code so the calling layer can
//! translate them without inspecting message strings.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for worktrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

impl CoreError {
    /// HTTP-style status code for the calling layer.
    ///
    /// Validation failures map to 400, everything else to 500.
    pub fn status_code(&self) -> u16 {
        match self {
            CoreError::Validation(v) => v.status_code(),
            _ => 500,
        }
    }
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Referenced row does not exist
    #[error("No {kind} found with id '{id}'")]
    NotFound { kind: &'static str, id: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Input validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Timestamp neither 10-digit seconds nor 13-digit milliseconds
    #[error("Unrecognized unix timestamp format: {0}")]
    BadTimestamp(String),

    /// Range bounds supplied as something other than integers
    #[error("Invalid time range input. Must be type of integer")]
    NonIntegerRange,

    /// Inverted time range
    #[error("Invalid time range: end ({end}) must not precede start ({start})")]
    InvertedRange { start: i64, end: i64 },

}

impl ValidationError {
    /// Every validation failure maps to a 400-class response code.
    pub fn status_code(&self) -> u16 {
        400
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
