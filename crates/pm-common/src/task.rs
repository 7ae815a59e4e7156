//! Typed maintenance task model.
//!
//! These are the normalized shapes the report engine works with. Loosely
//! shaped input records are converted into them once, in [`crate::record`];
//! nothing downstream inspects raw JSON again.

use crate::id::TaskId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recurrence schedule of a maintenance task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Biannually,
    Annually,
    /// Every `custom_days` days.
    Custom,
}

impl Frequency {
    /// All frequencies in display order.
    pub const ALL: [Frequency; 8] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Biannually,
        Frequency::Annually,
        Frequency::Custom,
    ];

    /// Wire value (`"biweekly"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Biannually => "biannually",
            Frequency::Annually => "annually",
            Frequency::Custom => "custom",
        }
    }

    /// Human label (`"Bi-Weekly"`).
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Biweekly => "Bi-Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::Biannually => "Bi-Annually",
            Frequency::Annually => "Annually",
            Frequency::Custom => "Custom Days",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" | "bi-weekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "biannually" | "bi-annually" | "semiannually" => Ok(Frequency::Biannually),
            "annually" | "yearly" => Ok(Frequency::Annually),
            "custom" => Ok(Frequency::Custom),
            _ => Err(format!("unknown frequency: {}", s)),
        }
    }
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
    Overdue,
}

impl TaskStatus {
    /// Wire value (`"overdue"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::Overdue => "overdue",
        }
    }

    /// Capitalized label (`"Overdue"`).
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Completed => "Completed",
            TaskStatus::Overdue => "Overdue",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "completed" => Ok(TaskStatus::Completed),
            "overdue" => Ok(TaskStatus::Overdue),
            _ => Err(format!("unknown status: {}", s)),
        }
    }
}

/// Before/after tag on an evidence image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Before,
    After,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Before => "before",
            ImageKind::After => "after",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "before" => Ok(ImageKind::Before),
            "after" => Ok(ImageKind::After),
            _ => Err(format!("unknown image type: {}", s)),
        }
    }
}

/// A before/after photograph attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceImage {
    /// Image id (source-assigned, or synthesized for legacy fields).
    pub id: String,
    /// URL, root-relative path or `data:` URL.
    pub url: String,
    /// Before/after tag.
    #[serde(rename = "type")]
    pub kind: ImageKind,
    /// Optional caption.
    #[serde(default)]
    pub caption: Option<String>,
    /// Optional capture timestamp.
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

impl EvidenceImage {
    /// Create an image with no caption or timestamp.
    pub fn new(id: impl Into<String>, url: impl Into<String>, kind: ImageKind) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            kind,
            caption: None,
            timestamp: None,
        }
    }

    /// Set the caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Set the timestamp.
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Single-image legacy fields, already resolved to URLs.
///
/// The URL field (`before_image_url`) wins over the bare field
/// (`before_image`) during normalization, so at most one URL per kind
/// survives here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyImageFields {
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
}

impl LegacyImageFields {
    /// Legacy URL for the given kind.
    pub fn get(&self, kind: ImageKind) -> Option<&str> {
        match kind {
            ImageKind::Before => self.before.as_deref(),
            ImageKind::After => self.after.as_deref(),
        }
    }
}

/// Every candidate evidence source of one task, normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSourceBundle {
    /// Dedicated before array.
    #[serde(default)]
    pub before_images: Vec<EvidenceImage>,
    /// Dedicated after array.
    #[serde(default)]
    pub after_images: Vec<EvidenceImage>,
    /// Mixed array; every entry carries a valid type tag.
    #[serde(default)]
    pub images: Vec<EvidenceImage>,
    /// Legacy single-image fields.
    #[serde(default)]
    pub legacy: LegacyImageFields,
}

impl ImageSourceBundle {
    /// Dedicated array for the given kind.
    pub fn dedicated(&self, kind: ImageKind) -> &[EvidenceImage] {
        match kind {
            ImageKind::Before => &self.before_images,
            ImageKind::After => &self.after_images,
        }
    }

    /// Whether no source carries anything.
    pub fn is_empty(&self) -> bool {
        self.before_images.is_empty()
            && self.after_images.is_empty()
            && self.images.is_empty()
            && self.legacy.before.is_none()
            && self.legacy.after.is_none()
    }
}

/// Machine reference attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineRef {
    pub machine_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl MachineRef {
    /// Display name, falling back to the machine id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.machine_id)
    }

    /// `name (location)` or just the name.
    pub fn describe(&self) -> String {
        match self.location.as_deref().filter(|l| !l.is_empty()) {
            Some(location) => format!("{} ({})", self.display_name(), location),
            None => self.display_name().to_string(),
        }
    }
}

/// Topic reference: either a titled topic or a bare numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TopicRef {
    Titled { id: Option<u64>, title: String },
    Id(u64),
}

impl TopicRef {
    /// Display text for the topic.
    pub fn display(&self) -> String {
        match self {
            TopicRef::Titled { title, .. } => title.clone(),
            TopicRef::Id(id) => id.to_string(),
        }
    }
}

/// A preventive maintenance task, read-only to the report engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceTask {
    /// Unique, stable identity.
    pub pm_id: TaskId,
    /// Task title.
    #[serde(default)]
    pub title: Option<String>,
    /// When the task is scheduled.
    pub scheduled_date: NaiveDateTime,
    /// When the task was completed.
    #[serde(default)]
    pub completed_date: Option<NaiveDateTime>,
    /// Completion value as written, when the record marks the task done
    /// with something that does not read as a date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_raw: Option<String>,
    /// Next due date computed by the record source.
    #[serde(default)]
    pub next_due_date: Option<NaiveDateTime>,
    /// Recurrence schedule.
    #[serde(default)]
    pub frequency: Option<Frequency>,
    /// Interval for [`Frequency::Custom`]; always `None` for other frequencies.
    #[serde(default)]
    pub custom_days: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub procedure: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(default)]
    pub machines: Vec<MachineRef>,
    #[serde(default)]
    pub topics: Vec<TopicRef>,
    /// Explicit status override stored on the record.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Normalized evidence sources.
    #[serde(default)]
    pub evidence: ImageSourceBundle,
}

impl MaintenanceTask {
    /// Create a task with only the required fields set.
    pub fn new(pm_id: impl Into<TaskId>, scheduled_date: NaiveDateTime) -> Self {
        Self {
            pm_id: pm_id.into(),
            title: None,
            scheduled_date,
            completed_date: None,
            completed_raw: None,
            next_due_date: None,
            frequency: None,
            custom_days: None,
            notes: None,
            procedure: None,
            job_description: None,
            property_id: None,
            machines: Vec::new(),
            topics: Vec::new(),
            status: None,
            evidence: ImageSourceBundle::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_completed_date(mut self, completed: NaiveDateTime) -> Self {
        self.completed_date = Some(completed);
        self
    }

    /// Whether the record carries any completion value, readable or not.
    pub fn is_completed(&self) -> bool {
        self.completed_date.is_some() || self.completed_raw.is_some()
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set the frequency; `custom_days` is kept only for [`Frequency::Custom`].
    pub fn with_frequency(mut self, frequency: Frequency, custom_days: Option<u32>) -> Self {
        self.frequency = Some(frequency);
        self.custom_days = if frequency == Frequency::Custom {
            custom_days
        } else {
            None
        };
        self
    }

    pub fn with_machine(mut self, machine: MachineRef) -> Self {
        self.machines.push(machine);
        self
    }

    pub fn with_property(mut self, property_id: impl Into<String>) -> Self {
        self.property_id = Some(property_id.into());
        self
    }

    pub fn with_evidence(mut self, evidence: ImageSourceBundle) -> Self {
        self.evidence = evidence;
        self
    }

    /// Frequency label for display; custom schedules show their interval.
    pub fn frequency_label(&self) -> String {
        match (self.frequency, self.custom_days) {
            (Some(Frequency::Custom), Some(days)) => format!("Every {} days", days),
            (Some(freq), _) => freq.label().to_string(),
            (None, _) => "N/A".to_string(),
        }
    }
}
