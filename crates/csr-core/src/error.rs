//! Core error types for csr-core.
//!
//! Recoverable and fatal failures are distinguished by variant:
//! [`AnalysisError`] is the only class a caller is expected to retry,
//! while [`CoreError::Precondition`] signals an upstream control-flow
//! defect and must not be caught and retried.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for csr-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Sentiment-analysis errors (recoverable: retry or skip)
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Violated precondition. Fatal: reaching this state is a navigation
    /// or composition bug, not something to recover from.
    #[error("Precondition violated: {0}")]
    Precondition(String),

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

    /// Schema creation failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures of the external sentiment-analysis service.
///
/// Both variants are recoverable: the presentation layer offers the user
/// retry (re-invoke analysis) or skip (score the question 0).
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The service could not be reached.
    #[error("Could not reach the sentiment-analysis service: {0}")]
    Connectivity(String),

    /// The service responded, but the response is unusable as a score.
    #[error("Sentiment-analysis response unusable: {0}")]
    UnusableResponse(String),
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

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            AnalysisError::Connectivity(err.to_string())
        } else {
            AnalysisError::UnusableResponse(err.to_string())
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
