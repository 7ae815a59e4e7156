//! Upload type and size checks.
//!
//! The file's magic bytes decide its type; a name or claimed MIME type is
//! never trusted.

use crate::error::ValidationFailure;
use serde::{Deserialize, Serialize};

/// Limits applied to every uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPolicy {
    /// Per-file size ceiling in bytes.
    pub max_bytes: u64,
    /// Accepted MIME types.
    pub allowed_types: Vec<String>,
    /// Longest edge after downscaling, in pixels.
    pub max_edge_px: u32,
    /// JPEG re-encode quality (1-100).
    pub jpeg_quality: u8,
}

/// 5 MiB.
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            allowed_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
            ],
            max_edge_px: 1600,
            jpeg_quality: 80,
        }
    }
}

impl UploadPolicy {
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn with_allowed_types(mut self, types: Vec<String>) -> Self {
        self.allowed_types = types;
        self
    }

    pub fn with_max_edge(mut self, max_edge_px: u32) -> Self {
        self.max_edge_px = max_edge_px;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    fn allows(&self, mime: &str) -> bool {
        self.allowed_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime))
    }
}

/// MIME type detected from magic bytes.
pub fn detect_mime(bytes: &[u8]) -> &'static str {
    infer::get(bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or("application/octet-stream")
}

/// Check one file against the policy, returning its detected MIME type.
pub fn validate_upload(bytes: &[u8], policy: &UploadPolicy) -> Result<&'static str, ValidationFailure> {
    if bytes.is_empty() {
        return Err(ValidationFailure::Empty);
    }

    let size = bytes.len() as u64;
    if size > policy.max_bytes {
        return Err(ValidationFailure::TooLarge {
            size,
            limit: policy.max_bytes,
        });
    }

    let mime = detect_mime(bytes);
    if !policy.allows(mime) {
        return Err(ValidationFailure::UnsupportedType {
            detected: mime.to_string(),
            allowed: policy.allowed_types.join(", "),
        });
    }

    Ok(mime)
}
