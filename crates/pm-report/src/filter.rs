//! Multi-criteria task filtering.

use crate::status::resolve_on;
use chrono::{Local, NaiveDate};
use pm_common::{Frequency, MaintenanceTask, TaskStatus};
use serde::{Deserialize, Serialize};

/// Independently optional filter criteria. Every present criterion must hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Resolved status must equal this.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Frequency must equal this.
    #[serde(default)]
    pub frequency: Option<Frequency>,
    /// Inclusive lower bound on the scheduled day. Ignored unless `end_date` is set too.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the scheduled day. Ignored unless `start_date` is set too.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive substring of title, id or notes.
    #[serde(default)]
    pub search: Option<String>,
    /// Exact machine id or machine name.
    #[serde(default)]
    pub machine: Option<String>,
    /// When false, tasks resolving to completed are excluded.
    #[serde(default = "default_true")]
    pub include_completed: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            status: None,
            frequency: None,
            start_date: None,
            end_date: None,
            search: None,
            machine: None,
            include_completed: true,
        }
    }
}

/// One filter echoed back on the summary page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedFilter {
    pub label: String,
    pub value: String,
}

impl AppliedFilter {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

impl FilterCriteria {
    /// Criteria that admit everything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_machine(mut self, machine: impl Into<String>) -> Self {
        self.machine = Some(machine.into());
        self
    }

    pub fn with_include_completed(mut self, include: bool) -> Self {
        self.include_completed = include;
        self
    }

    /// The date range, only when both bounds are present.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Case-folded needle; only an empty string disables the search.
    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn machine_term(&self) -> Option<&str> {
        self.machine.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Filters as displayed on the summary page, in a fixed order.
    ///
    /// Date bounds are echoed as given, even when only one is set.
    pub fn applied(&self) -> Vec<AppliedFilter> {
        let mut applied = Vec::new();
        if let Some(status) = self.status {
            applied.push(AppliedFilter::new("Status", status.label()));
        }
        if let Some(frequency) = self.frequency {
            applied.push(AppliedFilter::new("Frequency", frequency.label()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            applied.push(AppliedFilter::new("Search", format!("\"{}\"", search)));
        }
        if let Some(machine) = self.machine_term() {
            applied.push(AppliedFilter::new("Machine", machine));
        }
        if let Some(start) = self.start_date {
            applied.push(AppliedFilter::new("Start Date", start.to_string()));
        }
        if let Some(end) = self.end_date {
            applied.push(AppliedFilter::new("End Date", end.to_string()));
        }
        if !self.include_completed {
            applied.push(AppliedFilter::new("Completed Tasks", "Excluded"));
        }
        applied
    }
}

/// Build a predicate evaluated against the local current day.
pub fn build_predicate(criteria: &FilterCriteria) -> impl Fn(&MaintenanceTask) -> bool {
    build_predicate_on(criteria, Local::now().date_naive())
}

/// Build a predicate with an explicit reference day for status resolution.
pub fn build_predicate_on(
    criteria: &FilterCriteria,
    today: NaiveDate,
) -> impl Fn(&MaintenanceTask) -> bool {
    let status = criteria.status;
    let frequency = criteria.frequency;
    let range = criteria.date_range();
    let search = criteria.search_term();
    let machine = criteria.machine_term().map(str::to_string);
    let include_completed = criteria.include_completed;

    move |task: &MaintenanceTask| {
        if status.is_some() || !include_completed {
            let resolved = resolve_on(task, today);
            if status.is_some_and(|wanted| wanted != resolved) {
                return false;
            }
            if !include_completed && resolved == TaskStatus::Completed {
                return false;
            }
        }

        if let Some(wanted) = frequency {
            if task.frequency != Some(wanted) {
                return false;
            }
        }

        if let Some((start, end)) = range {
            let scheduled = task.scheduled_date.date();
            if scheduled < start || scheduled > end {
                return false;
            }
        }

        if let Some(ref needle) = search {
            if !matches_search(task, needle) {
                return false;
            }
        }

        if let Some(ref wanted) = machine {
            let hit = task
                .machines
                .iter()
                .any(|m| m.machine_id == *wanted || m.name.as_deref() == Some(wanted.as_str()));
            if !hit {
                return false;
            }
        }

        true
    }
}

fn matches_search(task: &MaintenanceTask, needle: &str) -> bool {
    let contains = |s: &str| s.to_lowercase().contains(needle);
    task.title.as_deref().is_some_and(contains)
        || contains(task.pm_id.as_str())
        || task.notes.as_deref().is_some_and(contains)
}
