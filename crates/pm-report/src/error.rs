//! Error types for report composition and rendering.

use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while composing or rendering a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Record normalization error.
    #[error("failed to read records: {0}")]
    RecordError(#[from] pm_common::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Rendering error.
    #[error("render error: {0}")]
    RenderError(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
