//! Application errors

use ac_denoise::DenoiseError;
use ac_file::FileError;
use thiserror::Error;

/// Top-level error for the file pipeline
#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("File error: {0}")]
    File(#[from] FileError),

    #[error("Denoise error: {0}")]
    Denoise(#[from] DenoiseError),

    #[error("Invalid settings: {0}")]
    Settings(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Result type for the application layer
pub type CleanerResult<T> = Result<T, CleanerError>;
