use std::iter::Peekable;
use std::str::{CharIndices, Lines};

use crate::domain::errors::FormatError;

/// Deepest allowed emphasis nesting.
pub const MAX_NESTING: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MdBlock {
    Header(u8, Vec<MdInline>),
    List {
        indent: u8,
        content: Vec<MdInline>,
        bullet: char,
    },
    BlockQuote(Vec<MdBlock>),
    CodeBlock {
        lang: Option<String>,
        code: String,
    },
    Subtext(Vec<MdInline>),
    Paragraph(Vec<MdInline>),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MdInline {
    Text(String),
    Bold(Vec<MdInline>),
    Italic(Vec<MdInline>),
    Underline(Vec<MdInline>),
    Strike(Vec<MdInline>),
    Spoiler(Vec<MdInline>),
    Code(String),
    Link { label: String, url: String },
}

/// Parses a single run of inline markdown.
///
/// # Errors
/// Returns error on an unclosed code span or emphasis nested deeper than
/// [`MAX_NESTING`].
pub fn parse_inline(input: &str) -> Result<Vec<MdInline>, FormatError> {
    parse_nested(input, 0, 0)
}

/// Parses multi-line markdown. Lines whose inline content fails to parse
/// are kept as raw text.
#[must_use]
pub fn parse_markdown(content: &str) -> Vec<MdBlock> {
    parse_blocks(&mut content.lines())
}

fn inline_or_raw(line: &str) -> Vec<MdInline> {
    parse_inline(line).unwrap_or_else(|_| vec![MdInline::Text(line.to_string())])
}

fn parse_blocks(lines: &mut Lines<'_>) -> Vec<MdBlock> {
    let mut blocks = Vec::new();
    let mut lines = lines.peekable();

    while let Some(line) = lines.next() {
        let line_trim_end = line.trim_end();

        if line_trim_end.is_empty() {
            blocks.push(MdBlock::Empty);
            continue;
        }

        if line_trim_end.starts_with("```") {
            let lang = line_trim_end.trim_start_matches('`').trim().to_string();
            let lang = if lang.is_empty() { None } else { Some(lang) };
            let mut code = Vec::new();

            for code_line in lines.by_ref() {
                if code_line.trim().starts_with("```") {
                    break;
                }
                code.push(code_line);
            }

            blocks.push(MdBlock::CodeBlock {
                lang,
                code: code.join("\n"),
            });
            continue;
        }

        if let Some(content) = line.strip_prefix("-# ") {
            blocks.push(MdBlock::Subtext(inline_or_raw(content)));
            continue;
        }

        if let Some((level, content)) = header(line) {
            blocks.push(MdBlock::Header(level, inline_or_raw(content)));
            continue;
        }

        if let Some(content) = line.strip_prefix(">>> ") {
            let mut quoted = String::from(content);
            for rest in lines.by_ref() {
                quoted.push('\n');
                quoted.push_str(rest);
            }
            blocks.push(MdBlock::BlockQuote(parse_blocks(&mut quoted.lines())));
            continue;
        }

        if let Some(content) = line.strip_prefix("> ") {
            let mut inner = vec![MdBlock::Paragraph(inline_or_raw(content))];
            while let Some(next) = lines.next_if(|l| l.starts_with("> ") && !l.starts_with(">>> ")) {
                let next_content = next.strip_prefix("> ").unwrap_or(next);
                inner.push(MdBlock::Paragraph(inline_or_raw(next_content)));
            }
            blocks.push(MdBlock::BlockQuote(inner));
            continue;
        }

        let trimmed = line.trim_start();
        let indent = u8::try_from((line.len() - trimmed.len()) / 2).unwrap_or(u8::MAX);
        if let Some((bullet, content)) = trimmed
            .strip_prefix("- ")
            .map(|c| ('-', c))
            .or_else(|| trimmed.strip_prefix("* ").map(|c| ('*', c)))
        {
            blocks.push(MdBlock::List {
                indent,
                content: inline_or_raw(content),
                bullet,
            });
            continue;
        }

        blocks.push(MdBlock::Paragraph(inline_or_raw(line)));
    }

    blocks
}

fn header(line: &str) -> Option<(u8, &str)> {
    [("### ", 3), ("## ", 2), ("# ", 1)]
        .into_iter()
        .find_map(|(prefix, level)| line.strip_prefix(prefix).map(|c| (level, c)))
}

fn parse_nested(input: &str, depth: usize, base: usize) -> Result<Vec<MdInline>, FormatError> {
    if depth > MAX_NESTING {
        return Err(FormatError::NestingTooDeep { max: MAX_NESTING });
    }

    let mut scanner = Scanner {
        input,
        depth,
        base,
        start: 0,
        inlines: Vec::new(),
    };
    let mut chars = input.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if let Some(end) = scanner.special(idx, ch)? {
            advance_chars(&mut chars, end);
            scanner.start = end;
        }
    }

    Ok(scanner.finish())
}

struct Scanner<'a> {
    input: &'a str,
    depth: usize,
    base: usize,
    start: usize,
    inlines: Vec<MdInline>,
}

impl Scanner<'_> {
    /// Handles a character that may open a construct. Returns the byte
    /// position just past the construct when one was consumed.
    fn special(&mut self, idx: usize, ch: char) -> Result<Option<usize>, FormatError> {
        let remaining = &self.input[idx..];
        match ch {
            '*' if remaining.starts_with("***") => self.container(idx, "***", |c| {
                MdInline::Italic(vec![MdInline::Bold(c)])
            }),
            '*' if remaining.starts_with("**") => self.container(idx, "**", MdInline::Bold),
            '*' => self.container(idx, "*", MdInline::Italic),
            '_' if remaining.starts_with("__") => self.container(idx, "__", MdInline::Underline),
            '_' => self.container(idx, "_", MdInline::Italic),
            '~' if remaining.starts_with("~~") => self.container(idx, "~~", MdInline::Strike),
            '|' if remaining.starts_with("||") => self.container(idx, "||", MdInline::Spoiler),
            '`' => self.code(idx).map(Some),
            '[' => Ok(self.masked_link(idx)),
            'h' => Ok(self.bare_link(idx)),
            '\\' => Ok(self.escape(idx)),
            _ => Ok(None),
        }
    }

    fn flush(&mut self, idx: usize) {
        if idx > self.start {
            self.inlines
                .push(MdInline::Text(self.input[self.start..idx].to_string()));
        }
    }

    fn container<F>(
        &mut self,
        idx: usize,
        delimiter: &str,
        constructor: F,
    ) -> Result<Option<usize>, FormatError>
    where
        F: Fn(Vec<MdInline>) -> MdInline,
    {
        let inner_start = idx + delimiter.len();
        let Some(end_offset) = self.input[inner_start..].find(delimiter) else {
            return Ok(None);
        };
        if end_offset == 0 {
            return Ok(None);
        }

        self.flush(idx);
        let inner_end = inner_start + end_offset;
        let children = parse_nested(
            &self.input[inner_start..inner_end],
            self.depth + 1,
            self.base + inner_start,
        )?;
        self.inlines.push(constructor(children));
        Ok(Some(inner_end + delimiter.len()))
    }

    fn code(&mut self, idx: usize) -> Result<usize, FormatError> {
        let fence_len = self.input[idx..]
            .bytes()
            .take_while(|b| *b == b'`')
            .count()
            .min(3);
        let fence = &self.input[idx..idx + fence_len];
        let inner_start = idx + fence_len;

        let end_offset = self.input[inner_start..]
            .find(fence)
            .ok_or(FormatError::UnclosedCodeSpan {
                offset: self.base + idx,
            })?;

        self.flush(idx);
        let code = &self.input[inner_start..inner_start + end_offset];
        self.inlines.push(MdInline::Code(code.to_string()));
        Ok(inner_start + end_offset + fence_len)
    }

    fn masked_link(&mut self, idx: usize) -> Option<usize> {
        let remaining = &self.input[idx..];
        let label_end = remaining.find("](")?;
        let url_start = label_end + 2;
        let url_len = remaining[url_start..].find(')')?;
        let url = &remaining[url_start..url_start + url_len];
        if !is_web_url(url) {
            return None;
        }

        self.flush(idx);
        self.inlines.push(MdInline::Link {
            label: remaining[1..label_end].to_string(),
            url: url.to_string(),
        });
        Some(idx + url_start + url_len + 1)
    }

    fn bare_link(&mut self, idx: usize) -> Option<usize> {
        let remaining = &self.input[idx..];
        if !is_web_url(remaining) {
            return None;
        }
        let len = remaining
            .find(|c: char| c.is_whitespace() || c == ')' || c == '>')
            .unwrap_or(remaining.len());

        self.flush(idx);
        let url = &remaining[..len];
        self.inlines.push(MdInline::Link {
            label: url.to_string(),
            url: url.to_string(),
        });
        Some(idx + len)
    }

    fn escape(&mut self, idx: usize) -> Option<usize> {
        let next = self.input[idx + 1..].chars().next()?;
        self.flush(idx);
        self.inlines.push(MdInline::Text(next.to_string()));
        Some(idx + 1 + next.len_utf8())
    }

    fn finish(mut self) -> Vec<MdInline> {
        let len = self.input.len();
        self.flush(len);
        self.inlines
            .into_iter()
            .filter(|n| !matches!(n, MdInline::Text(t) if t.is_empty()))
            .collect()
    }
}

fn is_web_url(s: &str) -> bool {
    (s.starts_with("https://") && s.len() > "https://".len())
        || (s.starts_with("http://") && s.len() > "http://".len())
}

fn advance_chars(chars: &mut Peekable<CharIndices<'_>>, target: usize) {
    while chars.next_if(|(idx, _)| *idx < target).is_some() {}
}
