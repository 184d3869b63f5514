//! File I/O errors

use std::path::PathBuf;

use ac_denoise::DenoiseError;
use thiserror::Error;

/// Decoder, encoder and filesystem errors
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Failed to read {path}: {message}")]
    ReadError { path: PathBuf, message: String },

    #[error("Failed to write {path}: {message}")]
    WriteError { path: PathBuf, message: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid signal: {0}")]
    Signal(#[from] DenoiseError),
}

impl FileError {
    pub(crate) fn read(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Self::ReadError {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub(crate) fn write(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Self::WriteError {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

/// Result type for file operations
pub type FileResult<T> = Result<T, FileError>;
