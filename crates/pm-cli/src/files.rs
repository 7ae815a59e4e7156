//! Reading record and override files, writing command artifacts.

use crate::error::{CliError, Result};
use pm_common::{normalize_records, NormalizedBatch};
use pm_report::EvidenceOverrides;
use std::path::Path;
use tracing::{debug, warn};

/// Read and normalize a records file. Skipped records are logged.
pub fn read_records(path: &Path) -> Result<NormalizedBatch> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("failed to read {}", path.display()), e))?;
    let batch = normalize_records(&json)?;

    for issue in &batch.issues {
        warn!(
            index = issue.index,
            pm_id = ?issue.pm_id,
            code = issue.code,
            "Skipped record: {}",
            issue.message
        );
    }
    debug!(
        path = %path.display(),
        records = batch.total_records,
        tasks = batch.tasks.len(),
        "Read records"
    );
    Ok(batch)
}

/// Load an overrides file: a JSON object mapping task ids to image arrays.
pub fn load_overrides(path: &Path) -> Result<EvidenceOverrides> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("failed to read {}", path.display()), e))?;
    serde_json::from_str(&json).map_err(|e| CliError::Overrides(format!("{}: {}", path.display(), e)))
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_artifact(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| CliError::io(format!("failed to create {}", parent.display()), e))?;
    }
    std::fs::write(path, contents)
        .map_err(|e| CliError::io(format!("failed to write {}", path.display()), e))
}
