//! `image` crate decoder adapter.

use std::io::Cursor;

use image::codecs::gif::GifDecoder;
use image::imageops::FilterType;
use image::{AnimationDecoder, DynamicImage, ImageFormat};
use tracing::trace;

use crate::domain::errors::DecodeError;
use crate::domain::ports::ImageDecoderPort;

/// Decodes PNG, JPEG, WebP and (animated) GIF data.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

impl ImageCrateDecoder {
    /// Creates a decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ImageDecoderPort for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
        image::load_from_memory(bytes).map_err(|e| DecodeError::malformed(e.to_string()))
    }

    fn decode_frames(&self, bytes: &[u8]) -> Result<Vec<DynamicImage>, DecodeError> {
        if !matches!(image::guess_format(bytes), Ok(ImageFormat::Gif)) {
            return Ok(vec![self.decode(bytes)?]);
        }

        let decoder =
            GifDecoder::new(Cursor::new(bytes)).map_err(|e| DecodeError::malformed(e.to_string()))?;
        let frames = decoder
            .into_frames()
            .collect_frames()
            .map_err(|e| DecodeError::malformed(e.to_string()))?;

        if frames.is_empty() {
            return Err(DecodeError::NoFrames);
        }

        trace!(frames = frames.len(), "Decoded animated image");

        Ok(frames
            .into_iter()
            .map(|frame| DynamicImage::ImageRgba8(frame.into_buffer()))
            .collect())
    }

    fn downsample(&self, image: &DynamicImage, size: u32) -> DynamicImage {
        if image.width() <= size && image.height() <= size {
            return image.clone();
        }
        image.resize(size, size, FilterType::Triangle)
    }
}
