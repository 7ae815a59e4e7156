//! Output filename convention.

use chrono::NaiveDate;

/// Lowercase ASCII slug of a title; runs of other characters collapse to `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "report".to_string()
    } else {
        slug
    }
}

/// `<slugified-title>-<YYYY-MM-DD>.<extension>`.
pub fn export_filename(title: &str, date: NaiveDate, extension: &str) -> String {
    format!(
        "{}-{}.{}",
        slugify(title),
        date.format("%Y-%m-%d"),
        extension.trim_start_matches('.')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_default_title_pdf() {
        assert_eq!(
            export_filename("Preventive Maintenance Report", date(), "pdf"),
            "preventive-maintenance-report-2024-06-15.pdf"
        );
    }

    #[test]
    fn test_slug_collapses_punctuation() {
        assert_eq!(slugify("  Plant #3 / Boilers -- Q2!  "), "plant-3-boilers-q2");
        assert_eq!(slugify("Ünïcode Tëst"), "n-code-t-st");
    }

    #[test]
    fn test_empty_slug_falls_back() {
        assert_eq!(export_filename("***", date(), ".html"), "report-2024-06-15.html");
    }
}
