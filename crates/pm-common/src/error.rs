//! Error types for maintenance records.
//!
//! Record-level problems are never fatal for a batch: the normalizer skips
//! the offending record and reports a [`RecordIssue`] instead. [`Error`] is
//! reserved for failures that stop a whole operation (unreadable input,
//! malformed top-level JSON).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for common operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A single record could not be interpreted.
    Record,
    /// The input document as a whole is malformed.
    Input,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Record => write!(f, "record"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Errors raised while reading maintenance records.
#[derive(Error, Debug)]
pub enum Error {
    // Record errors (10-19)
    #[error("record {index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("record {index} has an unparseable {field}: {value:?}")]
    InvalidDate {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("record {index} is not an object")]
    NotAnObject { index: usize },

    // Input errors (20-29)
    #[error("expected an array of task records or a paginated response, got {0}")]
    UnexpectedShape(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code for this error type.
    ///
    /// - 10-19: Record errors
    /// - 20-29: Input errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::MissingField { .. } => 10,
            Error::InvalidDate { .. } => 11,
            Error::NotAnObject { .. } => 12,
            Error::UnexpectedShape(_) => 20,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::MissingField { .. } | Error::InvalidDate { .. } | Error::NotAnObject { .. } => {
                ErrorCategory::Record
            }
            Error::UnexpectedShape(_) => ErrorCategory::Input,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }
}

/// A record that was skipped during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordIssue {
    /// Position of the record in the input array.
    pub index: usize,
    /// The record's `pm_id`, when it had one.
    pub pm_id: Option<String>,
    /// Stable error code (see [`Error::code`]).
    pub code: u32,
    /// Human-readable reason.
    pub message: String,
}

impl RecordIssue {
    /// Build an issue from a record-level error.
    pub fn from_error(err: &Error, pm_id: Option<String>) -> Self {
        let index = match err {
            Error::MissingField { index, .. }
            | Error::InvalidDate { index, .. }
            | Error::NotAnObject { index } => *index,
            _ => 0,
        };
        RecordIssue {
            index,
            pm_id,
            code: err.code(),
            message: err.to_string(),
        }
    }
}
