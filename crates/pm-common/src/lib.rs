//! Preventive maintenance common types, ids, and errors.
//!
//! This crate provides the foundational types shared by the report engine,
//! the evidence upload pipeline and the CLI:
//! - Task identity and the typed maintenance task model
//! - Evidence images and the normalized image source bundle
//! - Record normalization from loosely shaped JSON
//! - Date parsing for record timestamps
//! - Common error types

pub mod date;
pub mod error;
pub mod id;
pub mod record;
pub mod task;

pub use date::parse_record_date;
pub use error::{Error, RecordIssue, Result};
pub use id::TaskId;
pub use record::{normalize_records, normalize_value, NormalizedBatch};
pub use task::{
    EvidenceImage, Frequency, ImageKind, ImageSourceBundle, LegacyImageFields, MachineRef,
    MaintenanceTask, TaskStatus, TopicRef,
};
