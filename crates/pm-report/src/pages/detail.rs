//! Detail page data.

use super::table::{title_or_placeholder, topics_text};
use super::{format_day, format_optional_day};
use crate::classifier::ClassifiedEvidence;
use crate::layout::{select_layout, LayoutPlan};
use chrono::NaiveDateTime;
use pm_common::{MaintenanceTask, TaskStatus};
use serde::{Deserialize, Serialize};

/// A page of detail blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailPage {
    /// 1-based index among detail pages.
    pub index: usize,
    /// Number of detail pages.
    pub of: usize,
    pub blocks: Vec<DetailBlock>,
}

/// Before/after layouts for one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceGallery {
    pub before: LayoutPlan,
    pub after: LayoutPlan,
}

impl EvidenceGallery {
    pub fn from_evidence(evidence: &ClassifiedEvidence) -> Self {
        Self {
            before: select_layout(&evidence.before),
            after: select_layout(&evidence.after),
        }
    }

    /// Neither side has an image.
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }
}

/// Everything printed about one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailBlock {
    pub pm_id: String,
    pub title: String,
    pub status: TaskStatus,
    pub scheduled_date: NaiveDateTime,
    pub completed_date: Option<NaiveDateTime>,
    /// Completion value that is not a date, shown as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_raw: Option<String>,
    pub next_due_date: Option<NaiveDateTime>,
    /// Frequency label; custom schedules read "Every N days".
    pub frequency: String,
    pub topics: String,
    /// Machines as `name (location)`.
    pub machines: Vec<String>,
    pub property_id: Option<String>,
    pub description: Option<String>,
    pub procedure: Option<String>,
    pub notes: Option<String>,
    /// Present only when images are included.
    pub gallery: Option<EvidenceGallery>,
}

impl DetailBlock {
    pub fn from_task(
        task: &MaintenanceTask,
        status: TaskStatus,
        evidence: Option<&ClassifiedEvidence>,
    ) -> Self {
        Self {
            pm_id: task.pm_id.to_string(),
            title: title_or_placeholder(task),
            status,
            scheduled_date: task.scheduled_date,
            completed_date: task.completed_date,
            completed_raw: task.completed_raw.clone(),
            next_due_date: task.next_due_date,
            frequency: task.frequency_label(),
            topics: topics_text(task),
            machines: task.machines.iter().map(|m| m.describe()).collect(),
            property_id: non_blank(task.property_id.as_deref()),
            description: non_blank(task.job_description.as_deref()),
            procedure: non_blank(task.procedure.as_deref()),
            notes: non_blank(task.notes.as_deref()),
            gallery: evidence.map(EvidenceGallery::from_evidence),
        }
    }

    pub fn scheduled_formatted(&self) -> String {
        format_day(&self.scheduled_date)
    }

    pub fn completed_formatted(&self) -> String {
        match (&self.completed_date, &self.completed_raw) {
            (None, Some(raw)) => raw.clone(),
            (date, _) => format_optional_day(date.as_ref()),
        }
    }

    pub fn next_due_formatted(&self) -> String {
        format_optional_day(self.next_due_date.as_ref())
    }

    /// Machine list or `No machines assigned`.
    pub fn machines_text(&self) -> String {
        if self.machines.is_empty() {
            "No machines assigned".to_string()
        } else {
            self.machines.join(", ")
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
