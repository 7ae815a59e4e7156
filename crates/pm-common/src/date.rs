//! Record timestamp parsing.
//!
//! Record sources are inconsistent about date shapes. A field may carry a
//! full RFC 3339 timestamp, an ISO 8601 timestamp with a `+hhmm` offset, a
//! naive ISO timestamp, or a bare calendar day.
//! All of them are reduced to the wall-clock time as written; offsets are
//! not converted, so the calendar day a record shows is the day it reports.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a record timestamp.
///
/// Accepts RFC 3339, offsets written without a colon (`+0700`), `YYYY-MM-DDTHH:MM[:SS[.fff]]` (with `T` or a space)
/// and `YYYY-MM-DD` (interpreted as midnight). Returns `None` for blank or
/// unrecognized input.
pub fn parse_record_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}
