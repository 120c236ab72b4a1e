//! Production transcoding backend: `image` decode + `webp` encode.
//!
//! Decoding goes through the `image` crate's pure-Rust JPEG and PNG
//! decoders. Encoding uses the `webp` crate because the `image` crate's own
//! WebP encoder is lossless-only and the pipeline wants lossy output at a
//! configured quality.
//!
//! The encoded buffer is written with a single `fs::write`, so an output
//! file either holds a complete WebP or does not exist; a failed transcode
//! never leaves a truncated artifact behind.

use super::backend::{BackendError, ImageBackend};
use super::params::TranscodeParams;
use image::ImageReader;

/// Pure Rust backend using the `image` + `webp` crates.
pub struct WebpBackend;

impl WebpBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WebpBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for WebpBackend {
    fn transcode(&self, params: &TranscodeParams) -> Result<(), BackendError> {
        let img = ImageReader::open(&params.source)
            .map_err(BackendError::Io)?
            .decode()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "Failed to decode {}: {}",
                    params.source.display(),
                    e
                ))
            })?;

        // libwebp takes RGBA8; normalize whatever the decoder produced
        // (grayscale PNG, 16-bit PNG, ...) before encoding.
        let rgba = img.to_rgba8();
        let encoder = webp::Encoder::from_rgba(&rgba, rgba.width(), rgba.height());
        let encoded = encoder.encode(params.quality.value() as f32);

        std::fs::write(&params.output, &*encoded).map_err(BackendError::Io)
    }
}
