use std::sync::Arc;

use image::DynamicImage;
use ratatui::text::Span;

/// Ordering key of a resolved unit.
///
/// `index` is the originating token; `part` distinguishes the units of a
/// token that resolved into more than one (a formatted run followed by its
/// separator). Keys order by index first, so reassembly follows the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitKey {
    /// Token index.
    pub index: usize,
    /// Sub-position within the token.
    pub part: usize,
}

impl UnitKey {
    /// Key of the first (usually only) unit of a token.
    #[must_use]
    pub const fn first(index: usize) -> Self {
        Self { index, part: 0 }
    }

    /// Creates a key for a specific part of a token.
    #[must_use]
    pub const fn new(index: usize, part: usize) -> Self {
        Self { index, part }
    }
}

impl std::fmt::Display for UnitKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.index, self.part)
    }
}

/// Decoded, downsampled image shown inline with text.
///
/// Animated sources keep every frame; static sources have exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    source: String,
    frames: Arc<[DynamicImage]>,
}

impl InlineImage {
    /// Creates an inline image. Returns `None` when there are no frames.
    #[must_use]
    pub fn new(source: impl Into<String>, frames: Vec<DynamicImage>) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        Some(Self {
            source: source.into(),
            frames: Arc::from(frames),
        })
    }

    /// Creates a single-frame inline image.
    #[must_use]
    pub fn still(source: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            source: source.into(),
            frames: Arc::from(vec![image]),
        }
    }

    /// URL the image was loaded from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// All decoded frames.
    #[must_use]
    pub fn frames(&self) -> &[DynamicImage] {
        &self.frames
    }

    /// Number of frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if the image has more than one frame.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    /// Index of the frame shown at the given animation tick.
    #[must_use]
    pub fn frame_index(&self, tick: u64) -> usize {
        let len = self.frames.len() as u64;
        usize::try_from(tick % len).unwrap_or(0)
    }

    /// Frame to show for the given animation tick.
    #[must_use]
    pub fn frame_at(&self, tick: u64) -> &DynamicImage {
        &self.frames[self.frame_index(tick)]
    }

    /// Dimensions of the first frame.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        let first = &self.frames[0];
        (first.width(), first.height())
    }
}

/// Renderable content produced by resolving a token.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Styled text run.
    Text(Vec<Span<'static>>),
    /// Inline image.
    Image(InlineImage),
}

impl Fragment {
    /// Unstyled text run.
    #[must_use]
    pub fn raw(text: impl Into<String>) -> Self {
        Self::Text(vec![Span::raw(text.into())])
    }

    /// Plain text content (images contribute nothing).
    #[must_use]
    pub fn plain_text(&self) -> String {
        match self {
            Self::Text(spans) => spans.iter().map(|s| s.content.as_ref()).collect(),
            Self::Image(_) => String::new(),
        }
    }

    /// Returns the image, if this is an image fragment.
    #[must_use]
    pub const fn as_image(&self) -> Option<&InlineImage> {
        match self {
            Self::Image(image) => Some(image),
            Self::Text(_) => None,
        }
    }
}

/// A fragment tagged with its position in the message.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedUnit {
    key: UnitKey,
    fragment: Fragment,
}

#[allow(missing_docs)]
impl ResolvedUnit {
    #[must_use]
    pub const fn new(key: UnitKey, fragment: Fragment) -> Self {
        Self { key, fragment }
    }

    #[must_use]
    pub const fn key(&self) -> UnitKey {
        self.key
    }

    /// Index of the originating token.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.key.index
    }

    #[must_use]
    pub const fn fragment(&self) -> &Fragment {
        &self.fragment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_key_orders_by_index_then_part() {
        let mut keys = vec![
            UnitKey::new(2, 0),
            UnitKey::new(0, 1),
            UnitKey::new(1, 0),
            UnitKey::new(0, 0),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                UnitKey::new(0, 0),
                UnitKey::new(0, 1),
                UnitKey::new(1, 0),
                UnitKey::new(2, 0),
            ]
        );
    }

    #[test]
    fn test_inline_image_requires_frames() {
        assert!(InlineImage::new("https://x.gif", Vec::new()).is_none());
    }

    #[test]
    fn test_frame_at_wraps() {
        let frames = vec![
            DynamicImage::new_rgb8(1, 1),
            DynamicImage::new_rgb8(2, 2),
            DynamicImage::new_rgb8(3, 3),
        ];
        let image = InlineImage::new("https://x.gif", frames).unwrap();

        assert!(image.is_animated());
        assert_eq!(image.frame_at(0).width(), 1);
        assert_eq!(image.frame_at(4).width(), 2);
        assert_eq!(image.frame_at(5).width(), 3);
    }
}
