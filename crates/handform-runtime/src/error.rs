//! Runtime errors

use std::path::PathBuf;

use handform_core::HandformError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Handform(#[from] HandformError),

    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
