//! Maintenance report configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for `report.json`
//! - Config resolution (CLI → env → XDG → system → defaults)
//! - Semantic validation with stable error codes

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{resolve_config, ConfigSource, ResolvedPath};
pub use settings::{ExportDefaults, ReportSettings, UploadSettings};
pub use validate::{validate_settings, ValidationError, ValidationResult};

use std::path::Path;
use tracing::debug;

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Load settings using the standard resolution order, then validate them.
///
/// Falls back to built-in defaults when no file is found.
pub fn load_settings(cli_path: Option<&Path>) -> ValidationResult<(ReportSettings, ResolvedPath)> {
    let resolved = resolve_config(cli_path);
    let settings = match resolved.path {
        Some(ref path) => ReportSettings::from_file(path)?,
        None => ReportSettings::default(),
    };
    validate_settings(&settings)?;

    debug!(
        source = %resolved.source,
        path = ?resolved.path,
        "Loaded report settings"
    );

    Ok((settings, resolved))
}
