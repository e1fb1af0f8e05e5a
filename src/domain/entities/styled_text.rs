use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use super::{Fragment, InlineImage, ResolvedUnit};

/// Final, ordered result of resolving a message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyledText {
    units: Vec<ResolvedUnit>,
}

impl StyledText {
    /// Builds styled text from units, sorting them by key.
    #[must_use]
    pub fn from_units(mut units: Vec<ResolvedUnit>) -> Self {
        units.sort_by_key(ResolvedUnit::key);
        Self { units }
    }

    /// Single unstyled-or-styled run at index 0.
    #[must_use]
    pub fn single(fragment: Fragment) -> Self {
        Self {
            units: vec![ResolvedUnit::new(super::UnitKey::first(0), fragment)],
        }
    }

    /// Units in display order.
    #[must_use]
    pub fn units(&self) -> &[ResolvedUnit] {
        &self.units
    }

    /// Number of units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns true if nothing resolved to visible content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Fragments in display order.
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.units.iter().map(ResolvedUnit::fragment)
    }

    /// Inline images in display order.
    pub fn images(&self) -> impl Iterator<Item = &InlineImage> {
        self.fragments().filter_map(Fragment::as_image)
    }

    /// Returns true if any inline image has more than one frame.
    #[must_use]
    pub fn has_animation(&self) -> bool {
        self.images().any(InlineImage::is_animated)
    }

    /// Concatenated text content without styling or images.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.fragments().map(Fragment::plain_text).collect()
    }

    /// Converts to a single line, drawing images as `[img WxH]` placeholders.
    #[must_use]
    pub fn to_line(&self) -> Line<'static> {
        self.to_line_at(0)
    }

    /// Like [`Self::to_line`], showing each animated image at the frame
    /// picked by `tick` as `[img WxH i/n]`.
    #[must_use]
    pub fn to_line_at(&self, tick: u64) -> Line<'static> {
        let placeholder = Style::default().fg(Color::DarkGray);
        let spans: Vec<Span<'static>> = self
            .fragments()
            .flat_map(|fragment| match fragment {
                Fragment::Text(spans) => spans.clone(),
                Fragment::Image(image) => {
                    vec![Span::styled(image_placeholder(image, tick), placeholder)]
                }
            })
            .collect();
        Line::from(spans)
    }
}

fn image_placeholder(image: &InlineImage, tick: u64) -> String {
    let frame = image.frame_at(tick);
    let (w, h) = (frame.width(), frame.height());
    if image.is_animated() {
        let shown = image.frame_index(tick) + 1;
        format!("[img {w}x{h} {shown}/{}]", image.frame_count())
    } else {
        format!("[img {w}x{h}]")
    }
}
