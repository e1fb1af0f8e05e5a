//! Image decoding port definition.

use image::DynamicImage;

use crate::domain::errors::DecodeError;

/// Port for decoding and downsampling image data.
///
/// Calls are CPU-bound and synchronous; async callers move them onto a
/// blocking thread.
pub trait ImageDecoderPort: Send + Sync {
    /// Decodes the first (or only) frame.
    ///
    /// # Errors
    /// Returns error if the bytes are not a supported image.
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, DecodeError>;

    /// Decodes every frame of an animated image.
    ///
    /// # Errors
    /// Returns error if the bytes are not a supported image.
    fn decode_frames(&self, bytes: &[u8]) -> Result<Vec<DynamicImage>, DecodeError> {
        Ok(vec![self.decode(bytes)?])
    }

    /// Scales the image down to fit within `size`×`size`.
    fn downsample(&self, image: &DynamicImage, size: u32) -> DynamicImage;
}
