//! Styled text output for plain terminals.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{
    Attribute, Color as TermColor, ContentStyle, Print, PrintStyledContent, StyledContent,
};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};

/// Converts a ratatui style into a crossterm content style.
#[must_use]
pub fn to_content_style(style: Style) -> ContentStyle {
    let mut content = ContentStyle::new();
    content.foreground_color = style.fg.map(to_term_color);
    content.background_color = style.bg.map(to_term_color);

    let attributes = [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
        (Modifier::CROSSED_OUT, Attribute::CrossedOut),
        (Modifier::REVERSED, Attribute::Reverse),
        (Modifier::HIDDEN, Attribute::Hidden),
    ];
    for (modifier, attribute) in attributes {
        if style.add_modifier.contains(modifier) {
            content.attributes.set(attribute);
        }
    }
    content
}

const fn to_term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    }
}

/// Writes one line followed by a newline.
///
/// # Errors
/// Returns error if writing to `out` fails.
pub fn write_line<W: Write>(out: &mut W, line: &Line<'_>) -> io::Result<()> {
    for span in &line.spans {
        let style = line.style.patch(span.style);
        if style == Style::default() {
            queue!(out, Print(span.content.as_ref()))?;
        } else {
            queue!(
                out,
                PrintStyledContent(StyledContent::new(
                    to_content_style(style),
                    span.content.as_ref()
                ))
            )?;
        }
    }
    queue!(out, Print("\n"))?;
    Ok(())
}

/// Writes every line of `text` and flushes.
///
/// # Errors
/// Returns error if writing to `out` fails.
pub fn write_text<W: Write>(out: &mut W, text: &Text<'_>) -> io::Result<()> {
    for line in &text.lines {
        write_line(out, line)?;
    }
    out.flush()
}
