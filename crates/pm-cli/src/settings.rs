//! Mapping from the settings file to library option types.

use pm_config::{ExportDefaults, UploadSettings};
use pm_evidence::UploadPolicy;
use pm_report::ExportOptions;

/// Export options seeded from configured defaults.
pub fn export_options(defaults: &ExportDefaults) -> ExportOptions {
    ExportOptions::new()
        .with_title(defaults.title.clone())
        .with_details(defaults.include_details)
        .with_images(defaults.include_images)
        .with_completed(defaults.include_completed)
        .with_table_rows_per_page(defaults.table_rows_per_page)
        .with_details_per_page(defaults.details_per_page)
}

/// Upload policy built from configured limits.
pub fn upload_policy(settings: &UploadSettings) -> UploadPolicy {
    UploadPolicy::default()
        .with_max_bytes(settings.max_bytes)
        .with_allowed_types(settings.allowed_types.clone())
        .with_max_edge(settings.max_edge_px)
        .with_jpeg_quality(settings.jpeg_quality)
}
