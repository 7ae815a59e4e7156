//! No-mock records → document → HTML pipeline tests.
//!
//! Covers:
//! - Normalizing raw records and composing them against a fixed day
//! - Evidence precedence flowing through to table cells and galleries
//! - HTML preview content, placeholders and file output

use chrono::{NaiveDate, TimeZone, Utc};
use pm_common::{normalize_value, EvidenceImage, ImageKind, TaskId, TaskStatus};
use pm_report::layout::LayoutPlan;
use pm_report::{
    export_filename, EvidenceOverrides, ExportOptions, FilterCriteria, HtmlRenderer, PageKind,
    Renderer, ReportComposer,
};
use serde_json::json;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn composer(options: ExportOptions) -> ReportComposer {
    ReportComposer::new(options)
        .with_today(today())
        .with_generated_at(Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap())
}

fn records() -> serde_json::Value {
    json!([
        {
            "pm_id": "PM001",
            "pmtitle": "Chiller inspection",
            "scheduled_date": "2024-06-10T09:00:00Z",
            "frequency": "monthly",
            "machines": [{"machine_id": "M-1", "name": "Chiller", "location": "Roof"}],
            "topics": [{"id": 1, "title": "HVAC"}],
            "before_image_url": "/media/pm001_before.jpg"
        },
        {
            "pm_id": "PM002",
            "pmtitle": "Fire pump run test",
            "scheduled_date": "2024-06-20",
            "completed_date": "2024-06-14T16:45:00",
            "frequency": "weekly",
            "before_images": [
                {"id": 11, "url": "https://cdn.example.com/b1.jpg", "caption": "Gauge"},
                {"id": 12, "url": "https://cdn.example.com/b2.jpg"}
            ],
            "before_image_url": "/media/ignored.jpg",
            "images": [
                {"id": 13, "url": "https://cdn.example.com/a1.jpg", "type": "after"},
                {"id": 14, "url": "", "type": "after"},
                {"id": 15, "url": "https://cdn.example.com/x.jpg"}
            ]
        },
        {
            "pm_id": "PM003",
            "title": "Generator load bank",
            "scheduled_date": "2024-07-01",
            "frequency": "custom",
            "custom_days": 45,
            "property_id": "P-77",
            "notes": "Coordinate with security"
        },
        {"pmtitle": "Missing id", "scheduled_date": "2024-06-01"},
        {"pm_id": "PM005", "scheduled_date": "not a date"}
    ])
}

#[test]
fn normalized_records_compose_into_consistent_document() {
    let batch = normalize_value(&records()).expect("normalize");
    assert_eq!(batch.tasks.len(), 3);
    assert_eq!(batch.issues.len(), 2);

    let doc = composer(ExportOptions::new().with_images(true))
        .compose(&batch.tasks, &FilterCriteria::default());

    let summary = doc.summary().expect("summary");
    assert_eq!(summary.records_found, 3);
    assert_eq!(summary.stats.total, 3);
    assert_eq!(summary.stats.completed, 1);
    assert_eq!(summary.stats.overdue, 1);
    assert_eq!(summary.stats.pending, 1);
    assert_eq!(summary.stats.with_images, 2);

    let rows: Vec<_> = doc.table_rows().collect();
    assert_eq!(rows[0].status, TaskStatus::Overdue);
    assert_eq!(rows[0].last_column, "1B/0A");
    assert_eq!(rows[1].status, TaskStatus::Completed);
    assert_eq!(rows[1].last_column, "2B/2A");
    assert_eq!(rows[2].last_column, "No images");
    assert_eq!(rows[2].frequency, "Every 45 days");
}

#[test]
fn legacy_fallback_and_layouts_reach_the_gallery() {
    let batch = normalize_value(&records()).expect("normalize");
    let doc = composer(ExportOptions::new().with_images(true))
        .compose(&batch.tasks, &FilterCriteria::default());
    let blocks: Vec<_> = doc.detail_blocks().collect();

    let first = blocks[0].gallery.as_ref().expect("gallery");
    match &first.before {
        LayoutPlan::Single { image } => {
            assert_eq!(image.id, "legacy_before");
            assert_eq!(image.url, "/media/pm001_before.jpg");
        }
        other => panic!("unexpected layout {}", other.name()),
    }
    assert!(first.after.is_empty());

    let second = blocks[1].gallery.as_ref().expect("gallery");
    assert!(matches!(second.before, LayoutPlan::SideBySide { .. }));
    assert!(matches!(second.after, LayoutPlan::SideBySide { .. }));
}

#[test]
fn location_column_without_images() {
    let batch = normalize_value(&records()).expect("normalize");
    let doc = composer(ExportOptions::default()).compose(&batch.tasks, &FilterCriteria::default());
    let locations: Vec<_> = doc.table_rows().map(|r| r.last_column.as_str()).collect();
    assert_eq!(locations, vec!["Roof", "Unknown", "P-77"]);
    assert!(doc.detail_blocks().all(|b| b.gallery.is_none()));
}

#[test]
fn filters_and_options_combine() {
    let batch = normalize_value(&records()).expect("normalize");

    let criteria = FilterCriteria::new().with_status(TaskStatus::Completed);
    let doc = composer(ExportOptions::default()).compose(&batch.tasks, &criteria);
    let ids: Vec<_> = doc.table_rows().map(|r| r.pm_id.as_str()).collect();
    assert_eq!(ids, vec!["PM002"]);

    let doc = composer(ExportOptions::new().with_completed(false))
        .compose(&batch.tasks, &criteria);
    assert!(doc.is_empty());
    assert_eq!(doc.page_count(), 1);

    let criteria = FilterCriteria::new().with_date_range(Some(today()), None);
    let doc = composer(ExportOptions::default()).compose(&batch.tasks, &criteria);
    assert_eq!(doc.table_rows().count(), 3);

    let criteria = FilterCriteria::new().with_machine("Chiller");
    let doc = composer(ExportOptions::default()).compose(&batch.tasks, &criteria);
    assert_eq!(doc.table_rows().count(), 1);
}

#[test]
fn completion_values_the_parser_cannot_read_still_count_as_completed() {
    let batch = normalize_value(&json!([
        {"pm_id": "PM1", "scheduled_date": "2024-06-01", "completed_date": "2024-06-14T16:45:00+0700"},
        {"pm_id": "PM2", "scheduled_date": "2024-06-01", "completed_date": "14/06/2024"},
        {"pm_id": "PM3", "scheduled_date": "2024-06-01"}
    ]))
    .expect("normalize");
    assert_eq!(batch.tasks.len(), 3);

    let doc = composer(ExportOptions::default()).compose(&batch.tasks, &FilterCriteria::default());
    let summary = doc.summary().expect("summary");
    assert_eq!(summary.stats.completed, 2);
    assert_eq!(summary.stats.overdue, 1);

    let criteria = FilterCriteria::new().with_include_completed(false);
    let doc = composer(ExportOptions::default()).compose(&batch.tasks, &criteria);
    let ids: Vec<_> = doc.table_rows().map(|r| r.pm_id.as_str()).collect();
    assert_eq!(ids, vec!["PM3"]);

    let doc = composer(ExportOptions::default()).compose(&batch.tasks, &FilterCriteria::default());
    let html = HtmlRenderer::new()
        .with_minify(false)
        .render(&doc)
        .expect("render");
    assert!(html.contains("<dt>Completed</dt><dd>14/06/2024</dd>"));
}

#[test]
fn html_preview_contains_pages_and_placeholders() {
    let batch = normalize_value(&records()).expect("normalize");
    let doc = composer(
        ExportOptions::new()
            .with_title("Plant & Utilities")
            .with_images(true)
            .with_details_per_page(2),
    )
    .compose(&batch.tasks, &FilterCriteria::new().with_search(""));

    assert_eq!(doc.count_pages(PageKind::Table), 1);
    assert_eq!(doc.count_pages(PageKind::Detail), 2);

    let html = HtmlRenderer::new()
        .with_minify(false)
        .render(&doc)
        .expect("render");
    assert!(html.contains("Plant &amp; Utilities"));
    assert!(html.contains("Page 1 of 4"));
    assert!(html.contains("Page 4 of 4"));
    assert!(html.contains("Image could not be loaded"));
    assert!(html.contains("No before/after images available for this task"));
    assert!(html.contains("With Images"));
    assert!(html.contains("page-break-inside: avoid"));
}

#[test]
fn overrides_replace_evidence_end_to_end() {
    let batch = normalize_value(&records()).expect("normalize");
    let mut overrides = EvidenceOverrides::new();
    overrides.insert(
        TaskId::from("PM003"),
        vec![EvidenceImage::new(
            "upload_1",
            "data:image/png;base64,iVBORw0KGgo=",
            ImageKind::After,
        )],
    );
    let doc = composer(ExportOptions::new().with_images(true)).compose_with_overrides(
        &batch.tasks,
        &FilterCriteria::default(),
        &overrides,
    );
    let row = doc.table_rows().find(|r| r.pm_id == "PM003").expect("row");
    assert_eq!(row.last_column, "0B/1A");
    assert_eq!(doc.summary().expect("summary").stats.with_images, 3);
}

#[test]
fn rendered_preview_written_with_conventional_name() {
    let batch = normalize_value(&records()).expect("normalize");
    let options = ExportOptions::default();
    let doc = composer(options.clone()).compose(&batch.tasks, &FilterCriteria::default());

    let renderer = HtmlRenderer::new().with_minify(false);
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir
        .path()
        .join(export_filename(&options.title, today(), renderer.extension()));
    renderer.render_to_file(&doc, &path).expect("write");

    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("preventive-maintenance-report-2024-06-15.html")
    );
    let written = std::fs::read_to_string(&path).expect("read back");
    assert!(written.contains("Fire pump run test"));

    let json = doc.to_json().expect("json");
    let parsed = pm_report::DocumentModel::from_json(&json).expect("parse");
    assert_eq!(parsed.page_count(), doc.page_count());
}
