//! Evidence image uploads for maintenance reports.
//!
//! Each file is checked against an [`UploadPolicy`] (magic-byte type
//! detection plus a size ceiling), then downscaled so its longest edge fits
//! the configured limit. Batches run concurrently, one blocking task per
//! file, and report a separate outcome for every file.

pub mod batch;
pub mod downscale;
pub mod error;
pub mod validate;

pub use batch::{accepted_evidence, prepare_upload, prepare_uploads, PreparedImage, UploadFile, UploadOutcome};
pub use downscale::{downscale, fit_within, Downscaled};
pub use error::{Result, UploadError, ValidationFailure};
pub use validate::{detect_mime, validate_upload, UploadPolicy};
