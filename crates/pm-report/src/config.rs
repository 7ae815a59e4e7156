//! Export options.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};

/// Options controlling what a composed report contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Report title.
    #[serde(default = "default_title")]
    pub title: String,
    /// Emit one detail block per task.
    #[serde(default = "default_true")]
    pub include_details: bool,
    /// Emit evidence galleries and the image-count column.
    #[serde(default)]
    pub include_images: bool,
    /// Admit tasks resolving to completed.
    #[serde(default = "default_true")]
    pub include_completed: bool,
    /// Rows per table page.
    #[serde(default = "default_table_rows")]
    pub table_rows_per_page: usize,
    /// Detail blocks per detail page.
    #[serde(default = "default_details_per_page")]
    pub details_per_page: usize,
}

/// Title used when none is configured.
pub const DEFAULT_TITLE: &str = "Preventive Maintenance Report";

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
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

impl Default for ExportOptions {
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

impl ExportOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Toggle detail blocks.
    pub fn with_details(mut self, enabled: bool) -> Self {
        self.include_details = enabled;
        self
    }

    /// Toggle evidence galleries.
    pub fn with_images(mut self, enabled: bool) -> Self {
        self.include_images = enabled;
        self
    }

    /// Toggle completed tasks.
    pub fn with_completed(mut self, enabled: bool) -> Self {
        self.include_completed = enabled;
        self
    }

    /// Set rows per table page.
    pub fn with_table_rows_per_page(mut self, rows: usize) -> Self {
        self.table_rows_per_page = rows;
        self
    }

    /// Set detail blocks per page.
    pub fn with_details_per_page(mut self, details: usize) -> Self {
        self.details_per_page = details;
        self
    }

    /// Title to display, falling back to the default for blank titles.
    pub fn display_title(&self) -> &str {
        let trimmed = self.title.trim();
        if trimmed.is_empty() {
            DEFAULT_TITLE
        } else {
            trimmed
        }
    }

    /// Reject page sizes of zero.
    pub fn validate(&self) -> Result<()> {
        if self.table_rows_per_page == 0 {
            return Err(ReportError::InvalidConfig(
                "table_rows_per_page must be greater than zero".to_string(),
            ));
        }
        if self.details_per_page == 0 {
            return Err(ReportError::InvalidConfig(
                "details_per_page must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Load options from JSON.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
