//! Error taxonomy for log verification.

use std::path::PathBuf;

/// Errors produced while extracting events from log text.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("malformed JSON body for event {event} (header at line {line}): {source}")]
    Parse {
        event: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level errors for a verification run.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("cannot read log file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for verification operations.
pub type Result<T> = std::result::Result<T, VerifyError>;
