//! Summary statistics.

use crate::classifier::{classify_with_overrides, EvidenceOverrides};
use crate::status::resolve_on;
use chrono::{Local, NaiveDate};
use pm_common::{MaintenanceTask, TaskStatus};
use serde::{Deserialize, Serialize};

/// Roll-up counts over a task set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    /// Tasks whose classified evidence is nonempty.
    pub with_images: usize,
}

impl ReportStats {
    fn record(&mut self, status: TaskStatus, has_images: bool) {
        self.total += 1;
        match status {
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::Pending => self.pending += 1,
            TaskStatus::Overdue => self.overdue += 1,
        }
        if has_images {
            self.with_images += 1;
        }
    }
}

/// Aggregate against the local current day.
pub fn aggregate<'a, I>(tasks: I) -> ReportStats
where
    I: IntoIterator<Item = &'a MaintenanceTask>,
{
    aggregate_on(tasks, Local::now().date_naive())
}

/// Aggregate against an explicit reference day.
pub fn aggregate_on<'a, I>(tasks: I, today: NaiveDate) -> ReportStats
where
    I: IntoIterator<Item = &'a MaintenanceTask>,
{
    aggregate_with_overrides(tasks, today, &EvidenceOverrides::new())
}

/// Aggregate, counting images after applying evidence overrides.
pub fn aggregate_with_overrides<'a, I>(
    tasks: I,
    today: NaiveDate,
    overrides: &EvidenceOverrides,
) -> ReportStats
where
    I: IntoIterator<Item = &'a MaintenanceTask>,
{
    let mut stats = ReportStats::default();
    for task in tasks {
        let has_images = !classify_with_overrides(task, overrides).is_empty();
        stats.record(resolve_on(task, today), has_images);
    }
    stats
}
