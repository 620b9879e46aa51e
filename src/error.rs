//! Build error types
//!
//! All errors are build-time and fatal to the configuration level being
//! compiled. There is no retry or partial-success state.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid task name '{0}': must be non-empty and contain no '.', ':' or '@'")]
    InvalidTaskName(String),

    #[error("invalid unit name '{0}': must be non-empty")]
    InvalidUnitName(String),

    #[error("task name '{name}' produced by both {first} and {second}")]
    TaskCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("cannot shell-quote generated command '{0}'")]
    Quote(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("daemon config validation failed for {}: {reason}", path.display())]
    Validate { path: PathBuf, reason: String },
}
