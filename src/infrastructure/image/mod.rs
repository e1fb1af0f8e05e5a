//! Image handling infrastructure.
//!
//! This module provides:
//! - Decoding and downsampling through the `image` crate
//! - Custom emote CDN URLs

pub mod decoder;
pub mod emote_cdn;

pub use decoder::ImageCrateDecoder;
pub use emote_cdn::emote_url;
