//! Report settings file (`report.json`).

use crate::validate::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Export defaults applied when the caller does not override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDefaults {
    /// Report title.
    #[serde(default = "default_title")]
    pub title: String,
    /// Emit detail blocks.
    #[serde(default = "default_true")]
    pub include_details: bool,
    /// Emit evidence galleries and the image-count column.
    #[serde(default)]
    pub include_images: bool,
    /// Admit tasks resolving to completed.
    #[serde(default = "default_true")]
    pub include_completed: bool,
    /// Table rows per table page.
    #[serde(default = "default_table_rows")]
    pub table_rows_per_page: usize,
    /// Detail blocks per detail page.
    #[serde(default = "default_details_per_page")]
    pub details_per_page: usize,
}

fn default_title() -> String {
    "Preventive Maintenance Report".to_string()
}

fn default_true() -> bool {
    true
}

fn default_table_rows() -> usize {
    20
}

fn default_details_per_page() -> usize {
    3
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            title: default_title(),
            include_details: true,
            include_images: false,
            include_completed: true,
            table_rows_per_page: default_table_rows(),
            details_per_page: default_details_per_page(),
        }
    }
}

/// Evidence upload limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Per-file size ceiling in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    /// Accepted MIME types.
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
    /// Longest edge after downscaling, in pixels.
    #[serde(default = "default_max_edge")]
    pub max_edge_px: u32,
    /// JPEG re-encode quality (1-100).
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_max_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_allowed_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "image/gif".to_string(),
    ]
}

fn default_max_edge() -> u32 {
    1600
}

fn default_jpeg_quality() -> u8 {
    80
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            allowed_types: default_allowed_types(),
            max_edge_px: default_max_edge(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

/// Complete report settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Export defaults.
    #[serde(default)]
    pub export: ExportDefaults,
    /// Upload limits.
    #[serde(default)]
    pub uploads: UploadSettings,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            export: ExportDefaults::default(),
            uploads: UploadSettings::default(),
        }
    }
}

impl ReportSettings {
    /// Load settings from a JSON file.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parse settings from a JSON string.
    pub fn from_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
