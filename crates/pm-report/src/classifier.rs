//! Before/after evidence classification.
//!
//! A task's evidence can arrive through a dedicated array, a mixed tagged
//! array, or a single legacy field. For each kind the dedicated entries come
//! first, then the tagged mixed entries; the legacy field only contributes
//! when both are empty. Ids are not deduplicated across sources.

use pm_common::{EvidenceImage, ImageKind, MaintenanceTask, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Caller-owned per-task replacement images, keyed by task id.
pub type EvidenceOverrides = HashMap<TaskId, Vec<EvidenceImage>>;

/// Definitive evidence set for one task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedEvidence {
    pub before: Vec<EvidenceImage>,
    pub after: Vec<EvidenceImage>,
}

impl ClassifiedEvidence {
    /// Images of one kind.
    pub fn get(&self, kind: ImageKind) -> &[EvidenceImage] {
        match kind {
            ImageKind::Before => &self.before,
            ImageKind::After => &self.after,
        }
    }

    /// Whether neither kind has an image.
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }

    /// Image count per kind, formatted as `NB/MA`.
    pub fn summary(&self) -> String {
        format!("{}B/{}A", self.before.len(), self.after.len())
    }
}

/// Resolve the before/after sets for a task.
pub fn classify(task: &MaintenanceTask) -> ClassifiedEvidence {
    ClassifiedEvidence {
        before: collect(task, ImageKind::Before),
        after: collect(task, ImageKind::After),
    }
}

/// Like [`classify`], but an override entry for the task id replaces the
/// classified images, split by their type tag.
pub fn classify_with_overrides(
    task: &MaintenanceTask,
    overrides: &EvidenceOverrides,
) -> ClassifiedEvidence {
    match overrides.get(&task.pm_id) {
        Some(images) => {
            let (before, after) = images
                .iter()
                .cloned()
                .partition(|img| img.kind == ImageKind::Before);
            ClassifiedEvidence { before, after }
        }
        None => classify(task),
    }
}

fn collect(task: &MaintenanceTask, kind: ImageKind) -> Vec<EvidenceImage> {
    let bundle = &task.evidence;
    let mut images: Vec<EvidenceImage> = bundle.dedicated(kind).to_vec();
    images.extend(bundle.images.iter().filter(|img| img.kind == kind).cloned());

    if images.is_empty() {
        if let Some(url) = bundle.legacy.get(kind) {
            images.push(legacy_image(task, kind, url));
        }
    }
    images
}

fn legacy_image(task: &MaintenanceTask, kind: ImageKind, url: &str) -> EvidenceImage {
    let (caption, timestamp) = match kind {
        ImageKind::Before => ("Before maintenance", Some(task.scheduled_date)),
        ImageKind::After => ("After maintenance", task.completed_date),
    };
    let image =
        EvidenceImage::new(format!("legacy_{}", kind.as_str()), url, kind).with_caption(caption);
    match timestamp {
        Some(ts) => image.with_timestamp(ts),
        None => image,
    }
}
