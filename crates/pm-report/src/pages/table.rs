//! Task table page data.

use crate::classifier::ClassifiedEvidence;
use chrono::NaiveDateTime;
use pm_common::{MaintenanceTask, TaskStatus};
use serde::{Deserialize, Serialize};

/// What the final table column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastColumn {
    /// `NB/MA` image summary.
    Images,
    /// Location or machine text.
    Location,
}

impl LastColumn {
    pub fn header(&self) -> &'static str {
        match self {
            LastColumn::Images => "Images",
            LastColumn::Location => "Location",
        }
    }
}

/// One page of the task table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePage {
    /// 1-based index among table pages.
    pub index: usize,
    /// Number of table pages.
    pub of: usize,
    /// Final column mode.
    pub last_column: LastColumn,
    pub rows: Vec<TableRow>,
}

impl TablePage {
    /// Column headers in display order.
    pub fn headers(&self) -> [&'static str; 7] {
        [
            "Task ID",
            "Title",
            "Scheduled",
            "Status",
            "Frequency",
            "Topics",
            self.last_column.header(),
        ]
    }
}

/// One task row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub pm_id: String,
    pub title: String,
    pub scheduled_date: NaiveDateTime,
    pub status: TaskStatus,
    pub frequency: String,
    pub topics: String,
    /// Images summary or location text, per [`LastColumn`].
    pub last_column: String,
}

impl TableRow {
    /// Build a row. `evidence` selects the images column when present.
    pub fn from_task(
        task: &MaintenanceTask,
        status: TaskStatus,
        evidence: Option<&ClassifiedEvidence>,
    ) -> Self {
        let last_column = match evidence {
            Some(ev) if ev.is_empty() => "No images".to_string(),
            Some(ev) => ev.summary(),
            None => location_text(task),
        };
        Self {
            pm_id: task.pm_id.to_string(),
            title: title_or_placeholder(task),
            scheduled_date: task.scheduled_date,
            status,
            frequency: task.frequency_label(),
            topics: topics_text(task),
            last_column,
        }
    }
}

/// Title or `No title`.
pub(crate) fn title_or_placeholder(task: &MaintenanceTask) -> String {
    task.title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("No title")
        .to_string()
}

/// Comma-joined topic titles or `No topics`.
pub(crate) fn topics_text(task: &MaintenanceTask) -> String {
    if task.topics.is_empty() {
        return "No topics".to_string();
    }
    task.topics
        .iter()
        .map(|t| t.display())
        .collect::<Vec<_>>()
        .join(", ")
}

/// First machine's location, else its id, else the property id, else `Unknown`.
pub(crate) fn location_text(task: &MaintenanceTask) -> String {
    if let Some(machine) = task.machines.first() {
        let text = machine
            .location
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(&machine.machine_id);
        if !text.is_empty() {
            return text.to_string();
        }
        return "Unknown".to_string();
    }
    task.property_id
        .as_deref()
        .filter(|p| !p.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}
