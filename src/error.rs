//! Error types for the i18n synchronization engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by lingo operations.
///
/// Absent local chunk files and malformed export bodies are not errors; they
/// are recovered as empty trees at the call site. Path operations never fail.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote request failed: {0}")]
    Remote(String),

    #[error("{}: expected a top-level JSON object", path.display())]
    NotAnObject { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Remote(err.to_string())
    }
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::Config(err.to_string())
    }
}
