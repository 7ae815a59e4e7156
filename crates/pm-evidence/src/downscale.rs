//! Basic downscaling.
//!
//! Images whose longest edge exceeds the limit are resized to fit, keeping
//! aspect ratio and source format. Anything already within bounds is passed
//! through byte for byte.

use crate::error::{Result, UploadError, ValidationFailure};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use tracing::debug;

/// Downscaling result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downscaled {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub width: u32,
    pub height: u32,
    /// Whether the image was re-encoded.
    pub resized: bool,
}

/// Dimensions that fit `(width, height)` within `max_edge`, keeping aspect ratio.
pub fn fit_within(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let max_edge = max_edge.max(1);
    let longest = width.max(height);
    if longest <= max_edge {
        return (width, height);
    }
    let scale = f64::from(max_edge) / f64::from(longest);
    let w = ((f64::from(width) * scale).round() as u32).clamp(1, max_edge);
    let h = ((f64::from(height) * scale).round() as u32).clamp(1, max_edge);
    (w, h)
}

/// Decode `bytes` as `mime` and shrink it to `max_edge` if needed.
pub fn downscale(bytes: &[u8], mime: &str, max_edge: u32, jpeg_quality: u8) -> Result<Downscaled> {
    let format = ImageFormat::from_mime_type(mime).ok_or_else(|| {
        UploadError::Processing(format!("no image codec for {}", mime))
    })?;
    let img = image::load_from_memory_with_format(bytes, format).map_err(|e| {
        ValidationFailure::Decode {
            message: e.to_string(),
        }
    })?;

    let (width, height) = img.dimensions();
    let (new_w, new_h) = fit_within(width, height, max_edge);
    if (new_w, new_h) == (width, height) {
        return Ok(Downscaled {
            bytes: bytes.to_vec(),
            mime: mime.to_string(),
            width,
            height,
            resized: false,
        });
    }

    let resized = img.resize_exact(new_w, new_h, FilterType::Lanczos3);
    let encoded = encode(resized, format, jpeg_quality)?;
    debug!(
        from = %format!("{}x{}", width, height),
        to = %format!("{}x{}", new_w, new_h),
        bytes_before = bytes.len(),
        bytes_after = encoded.len(),
        "Downscaled image"
    );

    Ok(Downscaled {
        bytes: encoded,
        mime: mime.to_string(),
        width: new_w,
        height: new_h,
        resized: true,
    })
}

fn encode(img: DynamicImage, format: ImageFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let result = match format {
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(
                &mut out,
                jpeg_quality.clamp(1, 100),
            ))
        }
        ImageFormat::Gif => {
            DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut Cursor::new(&mut out), format)
        }
        _ => img.write_to(&mut Cursor::new(&mut out), format),
    };
    result.map_err(|e| UploadError::Processing(e.to_string()))?;
    Ok(out)
}
