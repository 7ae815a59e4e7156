//! Record normalization.
//!
//! The record source hands over loosely shaped JSON: optional fields may be
//! absent, `null`, blank strings, numbers where strings are expected, and
//! evidence images arrive through four different shapes. This module is the
//! single place where that shape is interpreted. Only `pm_id` and
//! `scheduled_date` are required; a record lacking either is skipped and
//! reported, and every other irregularity degrades to a default.

use crate::date::parse_record_date;
use crate::error::{Error, RecordIssue, Result};
use crate::id::TaskId;
use crate::task::{
    EvidenceImage, Frequency, ImageKind, ImageSourceBundle, LegacyImageFields, MachineRef,
    MaintenanceTask, TaskStatus, TopicRef,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Output of a normalization pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizedBatch {
    /// Records that normalized successfully, in input order.
    pub tasks: Vec<MaintenanceTask>,
    /// Records that were skipped.
    pub issues: Vec<RecordIssue>,
    /// Number of records in the input.
    pub total_records: usize,
}

/// Normalize a JSON document of task records.
///
/// The document may be an array of records or a paginated response object
/// with a `results` array.
pub fn normalize_records(json: &str) -> Result<NormalizedBatch> {
    let value: Value = serde_json::from_str(json)?;
    normalize_value(&value)
}

/// Normalize an already-parsed JSON document.
pub fn normalize_value(value: &Value) -> Result<NormalizedBatch> {
    let records = match value {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get("results") {
            Some(Value::Array(items)) => items,
            _ => return Err(Error::UnexpectedShape("object without a results array".into())),
        },
        other => return Err(Error::UnexpectedShape(json_kind(other).into())),
    };

    let mut batch = NormalizedBatch {
        total_records: records.len(),
        ..Default::default()
    };

    for (index, record) in records.iter().enumerate() {
        match normalize_record(index, record) {
            Ok(task) => batch.tasks.push(task),
            Err(err) => {
                let pm_id = record.get("pm_id").and_then(scalar_string);
                warn!(index, pm_id = ?pm_id, error = %err, "Skipping task record");
                batch.issues.push(RecordIssue::from_error(&err, pm_id));
            }
        }
    }

    debug!(
        total = batch.total_records,
        accepted = batch.tasks.len(),
        skipped = batch.issues.len(),
        "Normalized task records"
    );

    Ok(batch)
}

/// Normalize a single record.
fn normalize_record(index: usize, record: &Value) -> Result<MaintenanceTask> {
    let obj = record.as_object().ok_or(Error::NotAnObject { index })?;

    let pm_id = obj
        .get("pm_id")
        .and_then(scalar_string)
        .and_then(|s| TaskId::parse(&s))
        .ok_or(Error::MissingField {
            index,
            field: "pm_id",
        })?;

    let scheduled_raw = obj
        .get("scheduled_date")
        .and_then(scalar_string)
        .ok_or(Error::MissingField {
            index,
            field: "scheduled_date",
        })?;
    let scheduled_date = parse_record_date(&scheduled_raw).ok_or_else(|| Error::InvalidDate {
        index,
        field: "scheduled_date",
        value: scheduled_raw.clone(),
    })?;

    let frequency = text(obj, "frequency").and_then(|f| match f.parse::<Frequency>() {
        Ok(freq) => Some(freq),
        Err(_) => {
            debug!(%pm_id, frequency = %f, "Ignoring unknown frequency");
            None
        }
    });
    let custom_days = match frequency {
        Some(Frequency::Custom) => obj.get("custom_days").and_then(positive_int),
        _ => None,
    };

    let status = text(obj, "status").and_then(|s| match s.parse::<TaskStatus>() {
        Ok(status) => Some(status),
        Err(_) => {
            debug!(%pm_id, status = %s, "Ignoring unrecognized explicit status");
            None
        }
    });

    let mut machines = obj
        .get("machines")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(machine_ref).collect::<Vec<_>>())
        .unwrap_or_default();
    if machines.is_empty() {
        if let Some(machine_id) = text(obj, "machine_id") {
            machines.push(MachineRef {
                machine_id,
                name: None,
                location: None,
            });
        }
    }

    let topics = obj
        .get("topics")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(topic_ref).collect())
        .unwrap_or_default();

    let evidence = image_sources(&pm_id, obj);
    let (completed_date, completed_raw) = completion(&pm_id, obj.get("completed_date"));

    Ok(MaintenanceTask {
        title: text(obj, "pmtitle").or_else(|| text(obj, "title")),
        completed_date,
        completed_raw,
        next_due_date: optional_date(obj, "next_due_date"),
        frequency,
        custom_days,
        notes: text(obj, "notes"),
        procedure: text(obj, "procedure"),
        job_description: text(obj, "job_description"),
        property_id: text(obj, "property_id"),
        machines,
        topics,
        status,
        evidence,
        scheduled_date,
        pm_id,
    })
}

/// Collapse the four evidence shapes into one bundle.
fn image_sources(pm_id: &TaskId, obj: &Map<String, Value>) -> ImageSourceBundle {
    let dedicated = |field: &str, kind: ImageKind| -> Vec<EvidenceImage> {
        obj.get(field)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, item)| evidence_image(item, Some(kind), i))
                    .collect()
            })
            .unwrap_or_default()
    };

    let images = obj
        .get("images")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| {
                    let image = evidence_image(item, None, i);
                    if image.is_none() {
                        debug!(%pm_id, index = i, "Dropping mixed image without a type tag");
                    }
                    image
                })
                .collect()
        })
        .unwrap_or_default();

    ImageSourceBundle {
        before_images: dedicated("before_images", ImageKind::Before),
        after_images: dedicated("after_images", ImageKind::After),
        images,
        legacy: LegacyImageFields {
            before: legacy_url(obj, ImageKind::Before),
            after: legacy_url(obj, ImageKind::After),
        },
    }
}

/// Interpret one image entry.
///
/// Entries from a dedicated array take that array's kind; entries from the
/// mixed array must carry a valid `type` tag or they are dropped.
fn evidence_image(item: &Value, forced: Option<ImageKind>, position: usize) -> Option<EvidenceImage> {
    match item {
        Value::String(url) => {
            let kind = forced?;
            Some(EvidenceImage::new(
                format!("{}_{}", kind, position),
                url.trim(),
                kind,
            ))
        }
        Value::Object(obj) => {
            let tagged = obj
                .get("type")
                .and_then(Value::as_str)
                .and_then(|t| t.parse::<ImageKind>().ok());
            let kind = forced.or(tagged)?;
            let id = obj
                .get("id")
                .and_then(scalar_string)
                .unwrap_or_else(|| format!("{}_{}", kind, position));
            Some(EvidenceImage {
                id,
                url: image_url(obj).unwrap_or_default(),
                kind,
                caption: text(obj, "caption"),
                timestamp: optional_date(obj, "timestamp"),
            })
        }
        _ => None,
    }
}

/// Resolve a legacy single-image field, URL field first.
fn legacy_url(obj: &Map<String, Value>, kind: ImageKind) -> Option<String> {
    let url_field = format!("{}_image_url", kind);
    let bare_field = format!("{}_image", kind);

    if let Some(url) = text(obj, &url_field) {
        return Some(url);
    }
    match obj.get(&bare_field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(inner) => image_url(inner).or_else(|| {
            inner
                .get("id")
                .and_then(scalar_string)
                .map(|id| format!("/api/images/{}", id))
        }),
        _ => None,
    }
}

/// URL of an image object, from `url` or `image_url`.
fn image_url(obj: &Map<String, Value>) -> Option<String> {
    text(obj, "url").or_else(|| text(obj, "image_url"))
}

fn machine_ref(item: &Value) -> Option<MachineRef> {
    match item {
        Value::String(s) if !s.trim().is_empty() => Some(MachineRef {
            machine_id: s.trim().to_string(),
            name: None,
            location: None,
        }),
        Value::Object(obj) => {
            let name = text(obj, "name");
            let machine_id = obj
                .get("machine_id")
                .and_then(scalar_string)
                .or_else(|| name.clone())?;
            Some(MachineRef {
                machine_id,
                name,
                location: text(obj, "location"),
            })
        }
        _ => None,
    }
}

fn topic_ref(item: &Value) -> Option<TopicRef> {
    match item {
        Value::Number(n) => n.as_u64().map(TopicRef::Id),
        Value::Object(obj) => {
            let id = obj.get("id").and_then(Value::as_u64);
            match text(obj, "title") {
                Some(title) => Some(TopicRef::Titled { id, title }),
                None => id.map(TopicRef::Id),
            }
        }
        _ => None,
    }
}

/// Non-blank string field, trimmed.
fn text(obj: &Map<String, Value>, field: &str) -> Option<String> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn optional_date(obj: &Map<String, Value>, field: &str) -> Option<chrono::NaiveDateTime> {
    let raw = text(obj, field)?;
    let parsed = parse_record_date(&raw);
    if parsed.is_none() {
        debug!(field, value = %raw, "Ignoring unparseable optional date");
    }
    parsed
}

/// Interpret `completed_date`.
///
/// Any value other than null, `false`, `0` or a blank string marks the task
/// done. A value that does not read as a date is kept as written.
fn completion(
    pm_id: &TaskId,
    value: Option<&Value>,
) -> (Option<chrono::NaiveDateTime>, Option<String>) {
    let raw = match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => return (None, None),
        Some(Value::String(s)) if s.trim().is_empty() => return (None, None),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => return (None, None),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    };
    match parse_record_date(&raw) {
        Some(date) => (Some(date), None),
        None => {
            debug!(%pm_id, value = %raw, "Completion value is not a date; keeping it as written");
            (None, Some(raw))
        }
    }
}

/// String or number rendered as a string.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn positive_int(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().filter(|n| *n > 0)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
