//! Self-contained, print-friendly HTML preview.

use super::Renderer;
use crate::error::{ReportError, Result};
use crate::layout::LayoutPlan;
use crate::pages::*;

use pm_common::{EvidenceImage, TaskStatus};
use tracing::{debug, info};

/// Text shown in place of an image whose reference cannot be loaded.
pub const IMAGE_ERROR_TEXT: &str = "Image could not be loaded";

const NO_IMAGES_TEXT: &str = "No images available";
const NO_GALLERY_TEXT: &str = "No before/after images available for this task";
const EMPTY_REPORT_TEXT: &str = "No maintenance tasks match the selected filters.";

/// HTML preview renderer.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    minify: bool,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self {
            minify: !cfg!(debug_assertions),
        }
    }
}

impl HtmlRenderer {
    /// Renderer that minifies in release builds only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force minification on or off.
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    fn generate_html(&self, doc: &DocumentModel) -> String {
        let total = doc.pages.len();
        let pages: Vec<String> = doc
            .pages
            .iter()
            .enumerate()
            .map(|(i, page)| {
                let body = match page {
                    Page::Summary(summary) => self.generate_summary(summary),
                    Page::Table(table) => self.generate_table(table),
                    Page::Detail(detail) => self.generate_detail(detail),
                };
                format!(
                    r#"<section class="page page-{kind}">
{body}
    <footer class="page-footer">Page {number} of {total}</footer>
</section>"#,
                    kind = page_kind_class(page.kind()),
                    body = body,
                    number = i + 1,
                    total = total,
                )
            })
            .collect();

        format!(
            r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="generator" content="pm-report {version}">
    <meta name="robots" content="noindex, nofollow">
    <style>
        :root {{
            --text-primary: #111827;
            --text-secondary: #6b7280;
            --border-color: #e5e7eb;
            --accent-color: #2563eb;
        }}
        body {{
            color: var(--text-primary);
            font-family: ui-sans-serif, system-ui, sans-serif;
            font-size: 10pt;
            line-height: 1.4;
            margin: 0;
        }}
        .page {{
            box-sizing: border-box;
            width: 210mm;
            min-height: 297mm;
            margin: 0 auto 1rem;
            padding: 15mm;
            position: relative;
            border: 1px solid var(--border-color);
        }}
        .page-footer {{
            position: absolute;
            bottom: 8mm;
            left: 0;
            right: 0;
            text-align: center;
            font-size: 8pt;
            color: var(--text-secondary);
        }}
        h1 {{ font-size: 18pt; margin: 0 0 0.25rem; }}
        .subtitle {{ color: var(--text-secondary); margin: 0.1rem 0; }}
        .filters {{ border: 1px solid var(--border-color); padding: 0.5rem 0.75rem; margin: 1rem 0; }}
        .stats {{ display: flex; gap: 0.75rem; margin-top: 1rem; }}
        .stat-card {{ flex: 1; border: 1px solid var(--border-color); text-align: center; padding: 0.75rem; }}
        .stat-value {{ font-size: 16pt; font-weight: 700; color: var(--accent-color); }}
        .stat-label {{ font-size: 8pt; color: var(--text-secondary); }}
        .empty-report {{ margin-top: 2rem; text-align: center; color: var(--text-secondary); }}
        table {{ width: 100%; border-collapse: collapse; }}
        th, td {{ border: 1px solid var(--border-color); padding: 0.3rem 0.4rem; text-align: left; vertical-align: top; }}
        th {{ background: #f3f4f6; font-size: 8pt; text-transform: uppercase; }}
        .badge {{ display: inline-block; padding: 0.1rem 0.5rem; border-radius: 9999px; font-size: 8pt; font-weight: 600; }}
        .status-completed {{ background: #dcfce7; color: #166534; }}
        .status-pending {{ background: #fef9c3; color: #854d0e; }}
        .status-overdue {{ background: #fee2e2; color: #991b1b; }}
        .detail-block {{ border: 1px solid var(--border-color); padding: 0.75rem; margin-bottom: 0.75rem; page-break-inside: avoid; break-inside: avoid; }}
        .detail-block dl {{ display: grid; grid-template-columns: 9rem 1fr; gap: 0.2rem 0.5rem; margin: 0.5rem 0; }}
        .detail-block dt {{ color: var(--text-secondary); }}
        .detail-block dd {{ margin: 0; white-space: pre-wrap; }}
        .gallery {{ display: flex; gap: 0.75rem; }}
        .gallery-side {{ flex: 1; }}
        .gallery-side h4 {{ font-size: 8pt; margin: 0 0 0.25rem; }}
        .layout-grid {{ display: grid; grid-template-columns: 1fr 1fr; gap: 0.25rem; }}
        .image-row {{ display: flex; gap: 0.25rem; }}
        figure {{ margin: 0; }}
        img {{ max-width: 100%; object-fit: cover; }}
        .image-large img, .image-large.image-error {{ width: 100%; height: 45mm; }}
        .image-small img, .image-small.image-error {{ width: 100%; height: 22mm; }}
        figcaption, .image-timestamp, .overflow-caption {{ font-size: 7pt; color: var(--text-secondary); }}
        .image-error {{ display: flex; align-items: center; justify-content: center; border: 1px dashed var(--border-color); color: var(--text-secondary); font-size: 7pt; }}
        .no-images {{ color: var(--text-secondary); font-style: italic; }}
        @page {{ size: A4; margin: 0; }}
        @media print {{
            .page {{ border: none; margin: 0; page-break-after: always; }}
            .page:last-child {{ page-break-after: auto; }}
            tr, .stat-card {{ page-break-inside: avoid; }}
        }}
    </style>
</head>
<body>
{pages}
</body>
</html>"##,
            title = html_escape(&doc.title),
            version = html_escape(&doc.generator_version),
            pages = pages.join("\n"),
        )
    }

    fn generate_summary(&self, summary: &SummaryPage) -> String {
        let filters = if summary.has_filters() {
            let items: Vec<String> = summary
                .filters
                .iter()
                .map(|f| {
                    format!(
                        "<li>{}: {}</li>",
                        html_escape(&f.label),
                        html_escape(&f.value)
                    )
                })
                .collect();
            format!(
                r#"<div class="filters"><strong>Applied Filters:</strong><ul>{}</ul></div>"#,
                items.join("")
            )
        } else {
            String::new()
        };

        let body = if summary.empty {
            format!(r#"<p class="empty-report">{}</p>"#, EMPTY_REPORT_TEXT)
        } else {
            let stats = &summary.stats;
            let mut cards = vec![
                stat_card(stats.total, "Total Tasks"),
                stat_card(stats.completed, "Completed"),
                stat_card(stats.pending, "Pending"),
                stat_card(stats.overdue, "Overdue"),
            ];
            if summary.show_image_count {
                cards.push(stat_card(stats.with_images, "With Images"));
            }
            format!(r#"<div class="stats">{}</div>"#, cards.join(""))
        };

        format!(
            r#"    <header>
        <h1>{title}</h1>
        <p class="subtitle">Generated: {generated}</p>
        <p class="subtitle">{found}</p>
    </header>
    {filters}
    {body}"#,
            title = html_escape(&summary.title),
            generated = summary.generated_formatted(),
            found = html_escape(&summary.found_line()),
            filters = filters,
            body = body,
        )
    }

    fn generate_table(&self, table: &TablePage) -> String {
        let headers: Vec<String> = table
            .headers()
            .iter()
            .map(|h| format!("<th>{}</th>", h))
            .collect();
        let rows: Vec<String> = table
            .rows
            .iter()
            .map(|row| {
                format!(
                    "<tr><td>{id}</td><td>{title}</td><td>{scheduled}</td><td>{status}</td><td>{freq}</td><td>{topics}</td><td>{last}</td></tr>",
                    id = html_escape(&row.pm_id),
                    title = html_escape(&row.title),
                    scheduled = format_day(&row.scheduled_date),
                    status = status_badge(row.status),
                    freq = html_escape(&row.frequency),
                    topics = html_escape(&row.topics),
                    last = html_escape(&row.last_column),
                )
            })
            .collect();

        format!(
            r#"    <h2>Maintenance Tasks ({index}/{of})</h2>
    <table>
        <thead><tr>{headers}</tr></thead>
        <tbody>{rows}</tbody>
    </table>"#,
            index = table.index,
            of = table.of,
            headers = headers.join(""),
            rows = rows.join("\n"),
        )
    }

    fn generate_detail(&self, detail: &DetailPage) -> String {
        let blocks: Vec<String> = detail
            .blocks
            .iter()
            .map(|b| self.generate_block(b))
            .collect();
        format!(
            "    <h2>Task Details ({}/{})</h2>\n{}",
            detail.index,
            detail.of,
            blocks.join("\n")
        )
    }

    fn generate_block(&self, block: &DetailBlock) -> String {
        let mut fields = vec![
            ("Task ID", html_escape(&block.pm_id)),
            ("Scheduled", block.scheduled_formatted()),
            ("Frequency", html_escape(&block.frequency)),
            ("Topics", html_escape(&block.topics)),
            ("Next Due", block.next_due_formatted()),
            ("Machines", html_escape(&block.machines_text())),
        ];
        let optional = [
            ("Property", &block.property_id),
            ("Description", &block.description),
            ("Procedure", &block.procedure),
            ("Notes", &block.notes),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                fields.push((label, html_escape(value)));
            }
        }
        fields.push(("Completed", html_escape(&block.completed_formatted())));

        let dl: Vec<String> = fields
            .iter()
            .map(|(label, value)| format!("<dt>{}</dt><dd>{}</dd>", label, value))
            .collect();

        let gallery = block
            .gallery
            .as_ref()
            .map(|g| self.generate_gallery(g))
            .unwrap_or_default();

        format!(
            r#"<article class="detail-block">
        <h3>{title} {badge}</h3>
        <dl>{dl}</dl>
        {gallery}
    </article>"#,
            title = html_escape(&block.title),
            badge = status_badge(block.status),
            dl = dl.join(""),
            gallery = gallery,
        )
    }

    fn generate_gallery(&self, gallery: &EvidenceGallery) -> String {
        if gallery.is_empty() {
            return format!(r#"<p class="no-images">{}</p>"#, NO_GALLERY_TEXT);
        }
        format!(
            r#"<div class="gallery">
            <div class="gallery-side"><h4>BEFORE</h4>{before}</div>
            <div class="gallery-side"><h4>AFTER</h4>{after}</div>
        </div>"#,
            before = self.generate_layout(&gallery.before),
            after = self.generate_layout(&gallery.after),
        )
    }

    fn generate_layout(&self, plan: &LayoutPlan) -> String {
        let captions = plan.shows_captions();
        let inner = match plan {
            LayoutPlan::Empty => {
                return format!(r#"<p class="no-images">{}</p>"#, NO_IMAGES_TEXT);
            }
            LayoutPlan::Single { image } => render_image(image, "image-large", captions),
            LayoutPlan::SideBySide { images } => format!(
                r#"<div class="image-row">{}{}</div>"#,
                render_image(&images[0], "image-small", captions),
                render_image(&images[1], "image-small", captions),
            ),
            LayoutPlan::HeroWithPair { hero, pair } => format!(
                r#"{}<div class="image-row">{}{}</div>"#,
                render_image(hero, "image-large", captions),
                render_image(&pair[0], "image-small", captions),
                render_image(&pair[1], "image-small", captions),
            ),
            LayoutPlan::Grid { images, .. } => {
                let cells: Vec<String> = images
                    .iter()
                    .map(|img| render_image(img, "image-small", captions))
                    .collect();
                format!(r#"<div class="layout-grid">{}</div>"#, cells.join(""))
            }
        };
        let overflow = plan
            .overflow_caption()
            .map(|c| format!(r#"<p class="overflow-caption">{}</p>"#, c))
            .unwrap_or_default();
        format!(
            r#"<div class="layout layout-{}">{}{}</div>"#,
            plan.name(),
            inner,
            overflow
        )
    }
}

impl Renderer for HtmlRenderer {
    type Output = String;

    fn render(&self, document: &DocumentModel) -> Result<String> {
        if document.summary().is_none() {
            return Err(ReportError::RenderError(
                "document has no summary page".to_string(),
            ));
        }
        debug!(pages = document.page_count(), "Rendering HTML preview");

        let html = self.generate_html(document);

        let output = if self.minify {
            let cfg = minify_html::Cfg {
                minify_js: true,
                minify_css: true,
                ..Default::default()
            };
            String::from_utf8(minify_html::minify(html.as_bytes(), &cfg)).unwrap_or(html)
        } else {
            html
        };

        info!(
            bytes = output.len(),
            pages = document.page_count(),
            title = %document.title,
            "Report rendered"
        );

        Ok(output)
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}

fn page_kind_class(kind: PageKind) -> &'static str {
    match kind {
        PageKind::Summary => "summary",
        PageKind::Table => "table",
        PageKind::Detail => "detail",
    }
}

fn stat_card(value: usize, label: &str) -> String {
    format!(
        r#"<div class="stat-card"><div class="stat-value">{}</div><div class="stat-label">{}</div></div>"#,
        value, label
    )
}

fn status_badge(status: TaskStatus) -> String {
    format!(
        r#"<span class="badge status-{}">{}</span>"#,
        status.as_str(),
        status.label()
    )
}

fn render_image(image: &EvidenceImage, size_class: &str, show_caption: bool) -> String {
    if !is_renderable_url(&image.url) {
        return format!(
            r#"<div class="{} image-error">{}</div>"#,
            size_class, IMAGE_ERROR_TEXT
        );
    }
    let caption = match (&image.caption, show_caption) {
        (Some(text), true) => format!("<figcaption>{}</figcaption>", html_escape(text)),
        _ => String::new(),
    };
    let timestamp = image
        .timestamp
        .as_ref()
        .filter(|_| show_caption)
        .map(|ts| format!(r#"<div class="image-timestamp">{}</div>"#, format_timestamp(ts)))
        .unwrap_or_default();
    format!(
        r#"<figure class="{size}"><img src="{src}" alt="{alt}">{caption}{timestamp}</figure>"#,
        size = size_class,
        src = html_escape(image.url.trim()),
        alt = html_escape(&format!("{} image {}", image.kind, image.id)),
        caption = caption,
        timestamp = timestamp,
    )
}

/// Whether an image reference can be placed in an `<img>` tag.
///
/// Accepts http(s) URLs, `data:` URLs and root-relative paths.
pub fn is_renderable_url(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return false;
    }
    if url.starts_with('/') {
        return true;
    }
    let lower = url.to_ascii_lowercase();
    ["http://", "https://", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme) && lower.len() > scheme.len())
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ReportStats;
    use chrono::{NaiveDate, TimeZone, Utc};
    use pm_common::ImageKind;

    fn summary(empty: bool) -> SummaryPage {
        SummaryPage {
            title: "Plant <A>".to_string(),
            generated_at: Utc.with_ymd_and_hms(2024, 6, 15, 8, 0, 0).unwrap(),
            filters: Vec::new(),
            records_found: 2,
            stats: ReportStats {
                total: 2,
                completed: 1,
                pending: 1,
                overdue: 0,
                with_images: 1,
            },
            show_image_count: false,
            empty,
        }
    }

    fn doc(pages: Vec<Page>) -> DocumentModel {
        DocumentModel {
            title: "Plant <A>".to_string(),
            generated_at: Utc.with_ymd_and_hms(2024, 6, 15, 8, 0, 0).unwrap(),
            generator_version: "test".to_string(),
            pages,
        }
    }

    fn renderer() -> HtmlRenderer {
        HtmlRenderer::new().with_minify(false)
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape(r#""quoted""#), "&quot;quoted&quot;");
    }

    #[test]
    fn test_renderable_urls() {
        assert!(is_renderable_url("https://cdn.example.com/a.jpg"));
        assert!(is_renderable_url("HTTP://example.com/a.jpg"));
        assert!(is_renderable_url("/api/images/12"));
        assert!(is_renderable_url("data:image/png;base64,AAAA"));
        assert!(!is_renderable_url(""));
        assert!(!is_renderable_url("   "));
        assert!(!is_renderable_url("javascript:alert(1)"));
        assert!(!is_renderable_url("file:///etc/passwd"));
        assert!(!is_renderable_url("relative/path.jpg"));
        assert!(!is_renderable_url("https://"));
    }

    #[test]
    fn test_summary_only_document() {
        let html = renderer().render(&doc(vec![Page::Summary(summary(true))])).unwrap();
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("Plant &lt;A&gt;"));
        assert!(html.contains(EMPTY_REPORT_TEXT));
        assert!(html.contains("Page 1 of 1"));
        assert!(!html.contains("With Images"));
    }

    #[test]
    fn test_image_count_card_toggle() {
        let mut page = summary(false);
        page.show_image_count = true;
        let html = renderer().render(&doc(vec![Page::Summary(page)])).unwrap();
        assert!(html.contains("With Images"));
        assert!(html.contains("Total Tasks"));
    }

    #[test]
    fn test_missing_summary_is_render_error() {
        let err = renderer().render(&doc(Vec::new())).unwrap_err();
        assert!(matches!(err, ReportError::RenderError(_)));
    }

    #[test]
    fn test_bad_url_renders_placeholder() {
        let image = EvidenceImage::new("x", "", ImageKind::Before);
        let html = render_image(&image, "image-large", true);
        assert!(html.contains(IMAGE_ERROR_TEXT));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_side_by_side_suppresses_captions() {
        let images = [
            EvidenceImage::new("a", "/a.jpg", ImageKind::Before).with_caption("first"),
            EvidenceImage::new("b", "/b.jpg", ImageKind::Before).with_caption("second"),
        ];
        let html = renderer().generate_layout(&LayoutPlan::SideBySide { images });
        assert!(!html.contains("first"));
        assert!(html.contains("layout-side-by-side"));
    }

    #[test]
    fn test_grid_overflow_caption() {
        let img = |id: &str| EvidenceImage::new(id, "/i.jpg", ImageKind::After);
        let plan = LayoutPlan::Grid {
            images: [img("1"), img("2"), img("3"), img("4")],
            overflow: 3,
        };
        let html = renderer().generate_layout(&plan);
        assert!(html.contains("+ 3 more images"));
        assert_eq!(html.matches("<img").count(), 4);
    }

    #[test]
    fn test_detail_block_html() {
        let ts = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let block = DetailBlock {
            pm_id: "PM1".to_string(),
            title: "Pump".to_string(),
            status: TaskStatus::Overdue,
            scheduled_date: ts,
            completed_date: None,
            completed_raw: None,
            next_due_date: None,
            frequency: "Every 10 days".to_string(),
            topics: "No topics".to_string(),
            machines: Vec::new(),
            property_id: None,
            description: None,
            procedure: Some("Step 1".to_string()),
            notes: None,
            gallery: Some(EvidenceGallery {
                before: LayoutPlan::Empty,
                after: LayoutPlan::Empty,
            }),
        };
        let html = renderer().generate_block(&block);
        assert!(html.contains("status-overdue"));
        assert!(html.contains("Every 10 days"));
        assert!(html.contains("No machines assigned"));
        assert!(html.contains("Step 1"));
        assert!(html.contains(NO_GALLERY_TEXT));
        assert!(!html.contains("Notes"));
    }
}
