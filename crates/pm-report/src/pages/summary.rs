//! Summary page data.

use crate::filter::AppliedFilter;
use crate::stats::ReportStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary page: title, echoed filters and counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryPage {
    /// Report title.
    pub title: String,
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
    /// Filters in effect, as displayed.
    pub filters: Vec<AppliedFilter>,
    /// Records supplied before filtering.
    pub records_found: usize,
    /// Counts over the filtered set.
    pub stats: ReportStats,
    /// Show the with-images count.
    pub show_image_count: bool,
    /// No task survived filtering.
    pub empty: bool,
}

impl SummaryPage {
    /// `Found X records, showing Y`.
    pub fn found_line(&self) -> String {
        format!(
            "Found {} record{}, showing {}",
            self.records_found,
            if self.records_found == 1 { "" } else { "s" },
            self.stats.total
        )
    }

    /// Generation time for display.
    pub fn generated_formatted(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M UTC").to_string()
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }
}
