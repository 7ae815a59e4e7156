//! Task status resolution.
//!
//! The one place status is decided; summary counts, table cells and detail
//! badges all go through here.

use chrono::{Local, NaiveDate};
use pm_common::{MaintenanceTask, TaskStatus};

/// Resolve a task's status against the local current day.
pub fn resolve(task: &MaintenanceTask) -> TaskStatus {
    resolve_on(task, Local::now().date_naive())
}

/// Resolve a task's status against an explicit reference day.
///
/// An explicit status wins. Otherwise any completion value means completed, and
/// a scheduled day strictly before `today` means overdue.
pub fn resolve_on(task: &MaintenanceTask, today: NaiveDate) -> TaskStatus {
    if let Some(status) = task.status {
        return status;
    }
    if task.is_completed() {
        return TaskStatus::Completed;
    }
    if task.scheduled_date.date() < today {
        TaskStatus::Overdue
    } else {
        TaskStatus::Pending
    }
}
