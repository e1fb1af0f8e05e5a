//! Embed card model and terminal layout.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::application::services::TextFormatter;
use crate::domain::entities::{Embed, EmbedMedia};
use crate::infrastructure::config::EmbedConfig;

const STRIPE: &str = "▌ ";
const COLUMN_GAP: usize = 2;

/// Author line of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorLine {
    pub name: String,
    pub url: Option<String>,
    pub icon_url: Option<String>,
}

impl AuthorLine {
    #[must_use]
    pub const fn is_clickable(&self) -> bool {
        self.url.is_some()
    }
}

/// What kind of media a block shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Thumbnail,
}

/// A media element fitted into the card's media frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlock {
    pub kind: MediaKind,
    pub url: String,
    pub frame: (u32, u32),
}

/// One cell of the field grid.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCell {
    pub name: String,
    pub value: Text<'static>,
}

/// Display model of an embed.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedCard {
    pub accent: Color,
    pub author: Option<AuthorLine>,
    pub title: Option<String>,
    pub description: Option<Text<'static>>,
    pub media: Vec<MediaBlock>,
    pub field_rows: Vec<Vec<FieldCell>>,
    pub media_only: bool,
}

impl EmbedCard {
    /// Builds the card. Media-only embeds keep only their media blocks.
    #[must_use]
    pub fn from_embed(embed: &Embed, formatter: &TextFormatter, config: &EmbedConfig) -> Self {
        let media = media_blocks(embed, config);

        if embed.is_media_only() {
            return Self {
                accent: accent_color(embed.color),
                author: None,
                title: None,
                description: None,
                media,
                field_rows: Vec::new(),
                media_only: true,
            };
        }

        let author = embed.author.as_ref().map(|author| AuthorLine {
            name: author.name.clone(),
            url: author.url.clone(),
            icon_url: author.icon().map(str::to_string),
        });

        let description = embed
            .description
            .as_deref()
            .map(|d| formatter.format_block(d, config.shorten_links));

        let cells: Vec<FieldCell> = embed
            .fields
            .iter()
            .map(|field| FieldCell {
                name: field.name.clone(),
                value: formatter.format_block(&field.value, config.shorten_links),
            })
            .collect();
        let field_rows = cells
            .chunks(config.grid_columns.max(1))
            .map(<[FieldCell]>::to_vec)
            .collect();

        Self {
            accent: accent_color(embed.color),
            author,
            title: embed.title.clone(),
            description,
            media,
            field_rows,
            media_only: false,
        }
    }

    /// Opens the author link with the system handler. Returns false when
    /// the author has no link.
    ///
    /// # Errors
    /// Returns error if the system opener fails.
    pub fn open_author_link(&self) -> Result<bool, opener::OpenError> {
        let Some(url) = self.author.as_ref().and_then(|a| a.url.as_deref()) else {
            return Ok(false);
        };
        debug!(url = %url, "Opening author link");
        opener::open(url)?;
        Ok(true)
    }

    /// Lays the card out as terminal text.
    #[must_use]
    pub fn to_text(&self) -> Text<'static> {
        let mut lines: Vec<Line<'static>> = Vec::new();

        if !self.media_only {
            if let Some(author) = &self.author {
                let mut style = Style::default().add_modifier(Modifier::BOLD);
                if author.is_clickable() {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                lines.push(Line::from(Span::styled(author.name.clone(), style)));
            }
            if let Some(title) = &self.title {
                lines.push(Line::from(Span::styled(
                    title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
            }
            if let Some(description) = &self.description {
                lines.extend(description.lines.iter().cloned());
            }
        }

        for block in &self.media {
            let label = match block.kind {
                MediaKind::Image => "image",
                MediaKind::Video => "video",
                MediaKind::Thumbnail => "thumbnail",
            };
            lines.push(Line::from(Span::styled(
                format!("[{label} {}x{}] {}", block.frame.0, block.frame.1, block.url),
                Style::default().fg(Color::DarkGray),
            )));
        }

        for row in &self.field_rows {
            lines.extend(grid_row(row));
        }

        if self.media_only {
            return Text::from(lines);
        }

        let stripe = Style::default().fg(self.accent);
        Text::from(
            lines
                .into_iter()
                .map(|line| {
                    let mut spans = vec![Span::styled(STRIPE, stripe)];
                    spans.extend(line.spans);
                    Line::from(spans)
                })
                .collect::<Vec<_>>(),
        )
    }
}

fn media_blocks(embed: &Embed, config: &EmbedConfig) -> Vec<MediaBlock> {
    let mut blocks = Vec::new();
    if let Some(image) = &embed.image {
        blocks.extend(fit_block(image, MediaKind::Image, image.url.as_deref(), config));
    }

    let video = embed
        .video
        .as_ref()
        .and_then(|video| fit_block(video, MediaKind::Video, video.playable_url(), config));
    let secondary = video.or_else(|| {
        embed.thumbnail.as_ref().and_then(|thumb| {
            fit_block(thumb, MediaKind::Thumbnail, thumb.url.as_deref(), config)
        })
    });
    blocks.extend(secondary);
    blocks
}

fn fit_block(
    media: &EmbedMedia,
    kind: MediaKind,
    url: Option<&str>,
    config: &EmbedConfig,
) -> Option<MediaBlock> {
    url.map(|url| MediaBlock {
        kind,
        url: url.to_string(),
        frame: fit_media_frame(
            media.width,
            media.height,
            config.max_media_width,
            config.max_media_height,
        ),
    })
}

fn grid_row(row: &[FieldCell]) -> Vec<Line<'static>> {
    let widths: Vec<usize> = row
        .iter()
        .map(|cell| {
            let value_width = cell.value.lines.iter().map(Line::width).max().unwrap_or(0);
            cell.name.width().max(value_width)
        })
        .collect();
    let height = row
        .iter()
        .map(|cell| cell.value.lines.len())
        .max()
        .unwrap_or(0);

    let mut name_spans = Vec::new();
    for (cell, width) in row.iter().zip(&widths) {
        name_spans.push(Span::styled(
            pad(&cell.name, *width),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }
    let mut lines = vec![Line::from(name_spans)];

    for line_idx in 0..height {
        let mut spans = Vec::new();
        for (cell, width) in row.iter().zip(&widths) {
            let line = cell.value.lines.get(line_idx);
            let used = line.map_or(0, Line::width);
            if let Some(line) = line {
                spans.extend(line.spans.iter().cloned());
            }
            spans.push(Span::raw(" ".repeat(width - used + COLUMN_GAP)));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width()) + COLUMN_GAP;
    format!("{text}{}", " ".repeat(fill))
}

/// Scales `(width, height)` to fit inside the maximum frame, keeping the
/// aspect ratio. Unknown or zero sizes take the whole frame.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn fit_media_frame(
    width: Option<u32>,
    height: Option<u32>,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    let (Some(w), Some(h)) = (width, height) else {
        return (max_width, max_height);
    };
    if w == 0 || h == 0 {
        return (max_width, max_height);
    }

    let scale = f64::min(
        1.0,
        f64::min(
            f64::from(max_width) / f64::from(w),
            f64::from(max_height) / f64::from(h),
        ),
    );
    (
        ((f64::from(w) * scale).round() as u32).max(1),
        ((f64::from(h) * scale).round() as u32).max(1),
    )
}

/// Accent stripe color; black when the embed has none.
#[must_use]
pub fn accent_color(color: Option<u32>) -> Color {
    color.map_or(Color::Black, |c| {
        let [_, r, g, b] = c.to_be_bytes();
        Color::Rgb(r, g, b)
    })
}
