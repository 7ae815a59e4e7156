//! Document composition.

use crate::classifier::{classify_with_overrides, EvidenceOverrides};
use crate::config::ExportOptions;
use crate::filter::{build_predicate_on, FilterCriteria};
use crate::pages::*;
use crate::paging::group;
use crate::stats::aggregate_with_overrides;
use crate::status::resolve_on;

use chrono::{DateTime, Local, NaiveDate, Utc};
use pm_common::MaintenanceTask;
use tracing::{debug, info};

/// Turns a task snapshot into a [`DocumentModel`].
///
/// "Today" is fixed once per composition so the summary, table and detail
/// pages always agree on every task's status.
#[derive(Debug, Clone)]
pub struct ReportComposer {
    options: ExportOptions,
    today: Option<NaiveDate>,
    generated_at: Option<DateTime<Utc>>,
}

impl ReportComposer {
    /// Create a composer with export options.
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            today: None,
            generated_at: None,
        }
    }

    /// Create a composer with default options.
    pub fn default_config() -> Self {
        Self::new(ExportOptions::default())
    }

    /// Get the current options.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Pin the reference day used for status resolution.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Pin the generation timestamp.
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    /// Compose using the classified evidence of each task.
    pub fn compose(&self, tasks: &[MaintenanceTask], criteria: &FilterCriteria) -> DocumentModel {
        self.compose_with_overrides(tasks, criteria, &EvidenceOverrides::new())
    }

    /// Compose, replacing the evidence of any task present in `overrides`.
    pub fn compose_with_overrides(
        &self,
        tasks: &[MaintenanceTask],
        criteria: &FilterCriteria,
        overrides: &EvidenceOverrides,
    ) -> DocumentModel {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let generated_at = self.generated_at.unwrap_or_else(Utc::now);
        let options = &self.options;

        let mut effective = criteria.clone();
        effective.include_completed = criteria.include_completed && options.include_completed;

        let predicate = build_predicate_on(&effective, today);
        let filtered: Vec<&MaintenanceTask> = tasks.iter().filter(|t| predicate(t)).collect();
        debug!(
            records = tasks.len(),
            admitted = filtered.len(),
            "Filtered tasks"
        );

        let stats = aggregate_with_overrides(filtered.iter().copied(), today, overrides);
        let title = options.display_title().to_string();

        let mut pages = vec![Page::Summary(SummaryPage {
            title: title.clone(),
            generated_at,
            filters: effective.applied(),
            records_found: tasks.len(),
            stats,
            show_image_count: options.include_images,
            empty: filtered.is_empty(),
        })];

        if !filtered.is_empty() {
            let resolved: Vec<_> = filtered
                .iter()
                .map(|task| {
                    let evidence = options
                        .include_images
                        .then(|| classify_with_overrides(task, overrides));
                    (*task, resolve_on(task, today), evidence)
                })
                .collect();

            let rows: Vec<TableRow> = resolved
                .iter()
                .map(|(task, status, evidence)| {
                    TableRow::from_task(task, *status, evidence.as_ref())
                })
                .collect();
            let last_column = if options.include_images {
                LastColumn::Images
            } else {
                LastColumn::Location
            };
            let table_chunks = group(&rows, options.table_rows_per_page);
            let table_total = table_chunks.len();
            pages.extend(table_chunks.into_iter().enumerate().map(|(i, rows)| {
                Page::Table(TablePage {
                    index: i + 1,
                    of: table_total,
                    last_column,
                    rows,
                })
            }));
            debug!(pages = table_total, "Built table pages");

            if options.include_details {
                let blocks: Vec<DetailBlock> = resolved
                    .iter()
                    .map(|(task, status, evidence)| {
                        DetailBlock::from_task(task, *status, evidence.as_ref())
                    })
                    .collect();
                let detail_chunks = group(&blocks, options.details_per_page);
                let detail_total = detail_chunks.len();
                pages.extend(detail_chunks.into_iter().enumerate().map(|(i, blocks)| {
                    Page::Detail(DetailPage {
                        index: i + 1,
                        of: detail_total,
                        blocks,
                    })
                }));
                debug!(pages = detail_total, "Built detail pages");
            }
        }

        info!(
            tasks = stats.total,
            completed = stats.completed,
            pending = stats.pending,
            overdue = stats.overdue,
            pages = pages.len(),
            title = %title,
            "Report composed"
        );

        DocumentModel {
            title,
            generated_at,
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            pages,
        }
    }
}

/// Compose with a one-off composer.
pub fn compose(
    tasks: &[MaintenanceTask],
    criteria: &FilterCriteria,
    options: &ExportOptions,
) -> DocumentModel {
    ReportComposer::new(options.clone()).compose(tasks, criteria)
}
