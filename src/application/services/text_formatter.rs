use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use tracing::debug;

use super::markdown_parser::{MdBlock, MdInline, parse_inline, parse_markdown};
use crate::domain::errors::FormatError;

/// Inline rich-text formatter shared by the pipeline and embed cards.
#[derive(Debug, Clone)]
pub struct TextFormatter {
    link_style: Style,
    code_style: Style,
}

impl TextFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            link_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            code_style: Style::default().fg(Color::Red),
        }
    }

    /// Style used for links and mentions.
    #[must_use]
    pub const fn link_style(&self) -> Style {
        self.link_style
    }

    /// Formats a single run of text.
    ///
    /// # Errors
    /// Returns error if the run contains malformed markup.
    pub fn format_run(&self, raw: &str) -> Result<Vec<Span<'static>>, FormatError> {
        let inlines = parse_inline(raw)?;
        Ok(self.render_inlines(inlines, Style::default(), false))
    }

    /// Formats a run, falling back to the raw text on malformed markup.
    #[must_use]
    pub fn format_run_or_raw(&self, raw: &str) -> Vec<Span<'static>> {
        self.format_run(raw).unwrap_or_else(|e| {
            debug!(error = %e, run = %raw, "Formatting failed, using raw text");
            vec![Span::raw(raw.to_string())]
        })
    }

    /// Formats multi-line text such as an embed description.
    #[must_use]
    pub fn format_block(&self, content: &str, shorten_links: bool) -> Text<'static> {
        let mut lines = Vec::new();
        for block in parse_markdown(content) {
            self.render_block(block, &mut lines, Style::default(), shorten_links);
        }
        Text::from(lines)
    }

    fn render_block(
        &self,
        block: MdBlock,
        lines: &mut Vec<Line<'static>>,
        parent_style: Style,
        shorten: bool,
    ) {
        match block {
            MdBlock::Empty => lines.push(Line::raw("")),
            MdBlock::Paragraph(inlines) => {
                lines.push(Line::from(self.render_inlines(inlines, parent_style, shorten)));
            }
            MdBlock::Header(level, inlines) => {
                let style = parent_style.add_modifier(Modifier::BOLD);
                let mut spans = vec![Span::styled(
                    format!("{} ", "#".repeat(usize::from(level))),
                    style,
                )];
                spans.extend(self.render_inlines(inlines, style, shorten));
                lines.push(Line::from(spans));
            }
            MdBlock::Subtext(inlines) => {
                let style = parent_style.fg(Color::DarkGray).add_modifier(Modifier::DIM);
                lines.push(Line::from(self.render_inlines(inlines, style, shorten)));
            }
            MdBlock::List {
                indent,
                content,
                bullet,
            } => {
                let mut spans = vec![
                    Span::raw("  ".repeat(usize::from(indent))),
                    Span::styled(format!("{bullet} "), parent_style.fg(Color::Cyan)),
                ];
                spans.extend(self.render_inlines(content, parent_style, shorten));
                lines.push(Line::from(spans));
            }
            MdBlock::CodeBlock { code, .. } => {
                for code_line in code.lines() {
                    lines.push(Line::from(Span::styled(code_line.to_string(), self.code_style)));
                }
            }
            MdBlock::BlockQuote(inner_blocks) => {
                let mut inner_lines = Vec::new();
                for inner in inner_blocks {
                    self.render_block(
                        inner,
                        &mut inner_lines,
                        parent_style.add_modifier(Modifier::ITALIC),
                        shorten,
                    );
                }
                for line in inner_lines {
                    let mut spans = vec![Span::styled("┃ ", Style::default().fg(Color::DarkGray))];
                    spans.extend(line.spans);
                    lines.push(Line::from(spans));
                }
            }
        }
    }

    fn render_inlines(
        &self,
        inlines: Vec<MdInline>,
        style: Style,
        shorten: bool,
    ) -> Vec<Span<'static>> {
        let mut spans = Vec::new();

        for inline in inlines {
            match inline {
                MdInline::Text(t) => spans.push(Span::styled(t, style)),
                MdInline::Bold(children) => {
                    spans.extend(self.render_inlines(
                        children,
                        style.add_modifier(Modifier::BOLD),
                        shorten,
                    ));
                }
                MdInline::Italic(children) => {
                    spans.extend(self.render_inlines(
                        children,
                        style.add_modifier(Modifier::ITALIC),
                        shorten,
                    ));
                }
                MdInline::Underline(children) => {
                    spans.extend(self.render_inlines(
                        children,
                        style.add_modifier(Modifier::UNDERLINED),
                        shorten,
                    ));
                }
                MdInline::Strike(children) => {
                    spans.extend(self.render_inlines(
                        children,
                        style.add_modifier(Modifier::CROSSED_OUT),
                        shorten,
                    ));
                }
                MdInline::Spoiler(children) => {
                    let hidden = Style::default().bg(Color::DarkGray).fg(Color::DarkGray);
                    spans.extend(self.render_inlines(children, hidden, shorten));
                }
                MdInline::Code(code) => spans.push(Span::styled(code, self.code_style)),
                MdInline::Link { label, url } => {
                    let shown = if shorten && label == url {
                        link_host(&url).unwrap_or(label)
                    } else {
                        label
                    };
                    spans.push(Span::styled(shown, style.patch(self.link_style)));
                }
            }
        }
        spans
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Host part of a URL without a leading `www.`.
#[must_use]
pub fn link_host(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(spans: &[Span<'_>]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_format_run_styles() {
        let formatter = TextFormatter::new();
        let spans = formatter.format_run("**hi**").unwrap();
        assert_eq!(joined(&spans), "hi");
        assert!(spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_format_run_or_raw_falls_back() {
        let formatter = TextFormatter::new();
        let spans = formatter.format_run_or_raw("`open");
        assert_eq!(spans, vec![Span::raw("`open")]);
    }

    #[test]
    fn test_link_shortening() {
        let formatter = TextFormatter::new();
        let text = formatter.format_block("read https://www.example.com/a/b?c=d", true);
        let line = &text.lines[0];
        assert_eq!(line.spans[1].content, "example.com");
        assert_eq!(line.spans[1].style.fg, Some(Color::Blue));

        let text = formatter.format_block("read https://www.example.com/a", false);
        assert_eq!(text.lines[0].spans[1].content, "https://www.example.com/a");
    }

    #[test]
    fn test_masked_link_keeps_label() {
        let formatter = TextFormatter::new();
        let text = formatter.format_block("[docs](https://docs.rs)", true);
        assert_eq!(text.lines[0].spans[0].content, "docs");
    }

    #[test]
    fn test_spoiler_hidden() {
        let formatter = TextFormatter::new();
        let spans = formatter.format_run("||secret||").unwrap();
        assert_eq!(spans[0].style.bg, Some(Color::DarkGray));
        assert_eq!(spans[0].style.fg, Some(Color::DarkGray));
    }

    #[test]
    fn test_block_quote_prefix() {
        let formatter = TextFormatter::new();
        let text = formatter.format_block("> quoted\nplain", false);
        assert_eq!(text.lines.len(), 2);
        assert_eq!(text.lines[0].spans[0].content, "┃ ");
    }

    #[test]
    fn test_link_host() {
        assert_eq!(link_host("https://open.spotify.com/x").as_deref(), Some("open.spotify.com"));
        assert_eq!(link_host("not a url"), None);
    }
}
