//! Render-agnostic document model.

mod detail;
mod summary;
mod table;

pub use detail::{DetailBlock, DetailPage, EvidenceGallery};
pub use summary::SummaryPage;
pub use table::{LastColumn, TablePage, TableRow};

pub use crate::filter::AppliedFilter;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discriminant of a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Summary,
    Table,
    Detail,
}

/// One printed page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Page {
    Summary(SummaryPage),
    Table(TablePage),
    Detail(DetailPage),
}

impl Page {
    pub fn kind(&self) -> PageKind {
        match self {
            Page::Summary(_) => PageKind::Summary,
            Page::Table(_) => PageKind::Table,
            Page::Detail(_) => PageKind::Detail,
        }
    }
}

/// Ordered pages of one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentModel {
    /// Report title.
    pub title: String,
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
    /// Generator version.
    pub generator_version: String,
    /// Pages in print order; the first is always the summary.
    pub pages: Vec<Page>,
}

impl DocumentModel {
    /// The summary page.
    pub fn summary(&self) -> Option<&SummaryPage> {
        self.pages.iter().find_map(|page| match page {
            Page::Summary(summary) => Some(summary),
            _ => None,
        })
    }

    /// Whether the filtered task set was empty.
    pub fn is_empty(&self) -> bool {
        self.summary().map_or(true, |s| s.empty)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of pages of a given kind.
    pub fn count_pages(&self, kind: PageKind) -> usize {
        self.pages.iter().filter(|p| p.kind() == kind).count()
    }

    /// All table rows in order.
    pub fn table_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.pages
            .iter()
            .filter_map(|page| match page {
                Page::Table(table) => Some(table),
                _ => None,
            })
            .flat_map(|table| table.rows.iter())
    }

    /// All detail blocks in order.
    pub fn detail_blocks(&self) -> impl Iterator<Item = &DetailBlock> {
        self.pages
            .iter()
            .filter_map(|page| match page {
                Page::Detail(detail) => Some(detail),
                _ => None,
            })
            .flat_map(|detail| detail.blocks.iter())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// `YYYY-MM-DD` for a record timestamp.
pub fn format_day(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// `YYYY-MM-DD` or `N/A`.
pub fn format_optional_day(value: Option<&NaiveDateTime>) -> String {
    value.map(format_day).unwrap_or_else(|| "N/A".to_string())
}

/// `YYYY-MM-DD HH:MM` for image timestamps.
pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ReportStats;
    use chrono::TimeZone;

    fn empty_summary() -> SummaryPage {
        SummaryPage {
            title: "T".to_string(),
            generated_at: Utc.with_ymd_and_hms(2024, 6, 15, 8, 0, 0).unwrap(),
            filters: Vec::new(),
            records_found: 0,
            stats: ReportStats::default(),
            show_image_count: false,
            empty: true,
        }
    }

    #[test]
    fn test_page_kind_tag_serialization() {
        let page = Page::Summary(empty_summary());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["kind"], "summary");
        assert_eq!(page.kind(), PageKind::Summary);
    }

    #[test]
    fn test_document_accessors() {
        let doc = DocumentModel {
            title: "T".to_string(),
            generated_at: Utc.with_ymd_and_hms(2024, 6, 15, 8, 0, 0).unwrap(),
            generator_version: "test".to_string(),
            pages: vec![Page::Summary(empty_summary())],
        };
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.count_pages(PageKind::Table), 0);
        assert_eq!(doc.table_rows().count(), 0);

        let parsed = DocumentModel::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_format_optional_day() {
        let dt = chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 0)
            .unwrap();
        assert_eq!(format_optional_day(Some(&dt)), "2024-03-05");
        assert_eq!(format_optional_day(None), "N/A");
        assert_eq!(format_timestamp(&dt), "2024-03-05 14:07");
    }
}
