//! Concurrent preparation of uploaded evidence files.

use crate::downscale::downscale;
use crate::error::{Result, UploadError};
use crate::validate::{validate_upload, UploadPolicy};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::future::join_all;
use pm_common::{EvidenceImage, ImageKind};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// One file handed in for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Display name, usually the file name.
    pub name: String,
    pub kind: ImageKind,
    pub caption: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, kind: ImageKind, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            kind,
            caption: None,
            bytes,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Read a file from disk.
    pub fn from_path(path: &Path, kind: ImageKind) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, kind, bytes))
    }
}

/// A validated, possibly downscaled image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedImage {
    pub name: String,
    pub kind: ImageKind,
    pub caption: Option<String>,
    pub mime: String,
    pub width: u32,
    pub height: u32,
    pub original_len: usize,
    pub resized: bool,
    pub bytes: Vec<u8>,
}

impl PreparedImage {
    /// `data:` URL embedding the image bytes.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Convert into an evidence image with the given id.
    pub fn into_evidence(self, id: impl Into<String>) -> EvidenceImage {
        let url = self.data_url();
        let image = EvidenceImage::new(id, url, self.kind);
        match self.caption {
            Some(caption) => image.with_caption(caption),
            None => image,
        }
    }
}

/// Result for one file of a batch.
#[derive(Debug)]
pub struct UploadOutcome {
    pub name: String,
    pub result: Result<PreparedImage>,
}

/// Validate and downscale a single file.
pub fn prepare_upload(file: UploadFile, policy: &UploadPolicy) -> Result<PreparedImage> {
    let mime = validate_upload(&file.bytes, policy)?;
    let scaled = downscale(&file.bytes, mime, policy.max_edge_px, policy.jpeg_quality)?;
    Ok(PreparedImage {
        name: file.name,
        kind: file.kind,
        caption: file.caption,
        mime: scaled.mime,
        width: scaled.width,
        height: scaled.height,
        original_len: file.bytes.len(),
        resized: scaled.resized,
        bytes: scaled.bytes,
    })
}

/// Prepare every file concurrently on the blocking pool.
///
/// Outcomes come back in input order; one file failing never affects another.
pub async fn prepare_uploads(files: Vec<UploadFile>, policy: &UploadPolicy) -> Vec<UploadOutcome> {
    let policy = Arc::new(policy.clone());
    let total = files.len();

    let tasks = files.into_iter().map(|file| {
        let policy = Arc::clone(&policy);
        let name = file.name.clone();
        async move {
            let joined = tokio::task::spawn_blocking(move || prepare_upload(file, &policy)).await;
            let result = match joined {
                Ok(result) => result,
                Err(e) => Err(UploadError::Task(e.to_string())),
            };
            if let Err(ref err) = result {
                warn!(file = %name, code = err.code(), error = %err, "Upload rejected");
            }
            UploadOutcome { name, result }
        }
    });

    let outcomes = join_all(tasks).await;
    let accepted = outcomes.iter().filter(|o| o.result.is_ok()).count();
    info!(
        files = total,
        accepted,
        rejected = total - accepted,
        "Upload batch prepared"
    );
    outcomes
}

/// Evidence images for every accepted file, with ids `{prefix}_{n}`.
pub fn accepted_evidence(outcomes: Vec<UploadOutcome>, prefix: &str) -> Vec<EvidenceImage> {
    outcomes
        .into_iter()
        .filter_map(|o| o.result.ok())
        .enumerate()
        .map(|(i, prepared)| prepared.into_evidence(format!("{}_{}", prefix, i + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFailure;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([1, 2, 3])))
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_prepare_upload_and_evidence() {
        let file = UploadFile::new("pump.png", ImageKind::After, png(8, 8)).with_caption("Done");
        let prepared = prepare_upload(file, &UploadPolicy::default()).unwrap();
        assert_eq!(prepared.mime, "image/png");
        assert!(!prepared.resized);

        let evidence = prepared.into_evidence("upload_1");
        assert_eq!(evidence.kind, ImageKind::After);
        assert_eq!(evidence.caption.as_deref(), Some("Done"));
        assert!(evidence.url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_prepare_upload_rejects_text() {
        let file = UploadFile::new("notes.txt", ImageKind::Before, b"not an image".to_vec());
        let err = prepare_upload(file, &UploadPolicy::default()).unwrap_err();
        assert!(matches!(
            err,
            UploadError::Rejected(ValidationFailure::UnsupportedType { .. })
        ));
    }

    #[tokio::test]
    async fn test_batch_isolates_failures_and_keeps_order() {
        let files = vec![
            UploadFile::new("a.png", ImageKind::Before, png(4, 4)),
            UploadFile::new("empty.png", ImageKind::Before, Vec::new()),
            UploadFile::new("b.png", ImageKind::After, png(300, 100)),
        ];
        let policy = UploadPolicy::default().with_max_edge(150);
        let outcomes = prepare_uploads(files, &policy).await;

        let names: Vec<_> = outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "empty.png", "b.png"]);
        assert!(outcomes[0].result.is_ok());
        assert!(matches!(
            outcomes[1].result,
            Err(UploadError::Rejected(ValidationFailure::Empty))
        ));
        let resized = outcomes[2].result.as_ref().unwrap();
        assert!(resized.resized);
        assert_eq!((resized.width, resized.height), (150, 50));

        let evidence = accepted_evidence(outcomes, "upload");
        let ids: Vec<_> = evidence.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["upload_1", "upload_2"]);
    }
}
