//! Upload error types.

use serde::Serialize;
use thiserror::Error;

/// Result type for upload preparation.
pub type Result<T> = std::result::Result<T, UploadError>;

/// Why a file was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ValidationFailure {
    #[error("file is empty")]
    Empty,

    #[error("unsupported file type {detected} (allowed: {allowed})")]
    UnsupportedType { detected: String, allowed: String },

    #[error("file is {size} bytes, over the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("image could not be decoded: {message}")]
    Decode { message: String },
}

impl ValidationFailure {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationFailure::Empty => 30,
            ValidationFailure::UnsupportedType { .. } => 31,
            ValidationFailure::TooLarge { .. } => 32,
            ValidationFailure::Decode { .. } => 33,
        }
    }
}

/// Per-file upload failure.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("rejected: {0}")]
    Rejected(#[from] ValidationFailure),

    #[error("image processing failed: {0}")]
    Processing(String),

    #[error("upload task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    pub fn code(&self) -> u32 {
        match self {
            UploadError::Rejected(failure) => failure.code(),
            UploadError::Processing(_) => 40,
            UploadError::Task(_) => 41,
            UploadError::Io(_) => 42,
        }
    }
}
