//! Configuration validation errors and semantic validation.

use crate::settings::{ExportDefaults, ReportSettings, UploadSettings};
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate report settings semantically.
pub fn validate_settings(settings: &ReportSettings) -> ValidationResult<()> {
    let major = settings.schema_version.split('.').next().unwrap_or("");
    let expected_major = crate::CONFIG_SCHEMA_VERSION
        .split('.')
        .next()
        .unwrap_or("");
    if major != expected_major {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: settings.schema_version.clone(),
        });
    }

    validate_export(&settings.export)?;
    validate_uploads(&settings.uploads)?;

    Ok(())
}

fn validate_export(export: &ExportDefaults) -> ValidationResult<()> {
    if export.title.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "export.title".to_string(),
            message: "must not be blank".to_string(),
        });
    }
    check_positive("export.table_rows_per_page", export.table_rows_per_page as u64)?;
    check_positive("export.details_per_page", export.details_per_page as u64)?;
    Ok(())
}

fn validate_uploads(uploads: &UploadSettings) -> ValidationResult<()> {
    check_positive("uploads.max_bytes", uploads.max_bytes)?;
    check_positive("uploads.max_edge_px", u64::from(uploads.max_edge_px))?;

    if uploads.jpeg_quality == 0 || uploads.jpeg_quality > 100 {
        return Err(ValidationError::InvalidValue {
            field: "uploads.jpeg_quality".to_string(),
            message: format!("must be in 1..=100, got {}", uploads.jpeg_quality),
        });
    }

    if uploads.allowed_types.is_empty() {
        return Err(ValidationError::SemanticError(
            "uploads.allowed_types must list at least one MIME type".to_string(),
        ));
    }
    for mime in &uploads.allowed_types {
        if !mime.starts_with("image/") {
            return Err(ValidationError::InvalidValue {
                field: "uploads.allowed_types".to_string(),
                message: format!("'{}' is not an image MIME type", mime),
            });
        }
    }

    Ok(())
}

fn check_positive(field: &str, value: u64) -> ValidationResult<()> {
    if value == 0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}
