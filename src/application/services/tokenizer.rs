//! Splits message text into position-tagged segments.

use crate::domain::entities::Token;

use super::token_classifier::classify;

/// One space-delimited piece of the source text, not yet classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Position among all segments.
    pub index: usize,
    /// Byte offset into the source text.
    pub offset: usize,
    /// The segment text, possibly empty.
    pub raw: &'a str,
    /// True when a space follows this segment.
    pub trailing_separator: bool,
}

impl Segment<'_> {
    /// Classifies the segment into a token.
    #[must_use]
    pub fn classify(self) -> Token {
        Token::new(
            self.index,
            self.offset,
            self.raw,
            classify(self.raw),
            self.trailing_separator,
        )
    }
}

/// Splits on every single space. Runs of spaces yield empty segments so
/// that the spacing survives reassembly.
#[must_use]
pub fn split(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut offset = 0;
    let mut pieces = text.split(' ').enumerate().peekable();

    while let Some((index, raw)) = pieces.next() {
        let trailing_separator = pieces.peek().is_some();
        segments.push(Segment {
            index,
            offset,
            raw,
            trailing_separator,
        });
        offset += raw.len() + 1;
    }

    segments
}

/// Splits and classifies in one pass.
#[must_use]
pub fn tokenize(text: &str) -> Vec<Token> {
    split(text).into_iter().map(Segment::classify).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::TokenKind;
    use test_case::test_case;

    #[test_case("hello world", &["hello", "world"] ; "two words")]
    #[test_case("a  b", &["a", "", "b"] ; "double space keeps empty segment")]
    #[test_case("trailing ", &["trailing", ""] ; "trailing space")]
    #[test_case("", &[""] ; "empty text")]
    #[test_case(" lead", &["", "lead"] ; "leading space")]
    fn test_split_pieces(text: &str, expected: &[&str]) {
        let raws: Vec<&str> = split(text).iter().map(|s| s.raw).collect();
        assert_eq!(raws, expected);
    }

    #[test]
    fn test_indices_are_contiguous() {
        let segments = split("one two  three four");
        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(segment.index, i);
        }
    }

    #[test]
    fn test_offsets_point_into_source() {
        let text = "héllo  wörld x";
        for segment in split(text) {
            assert_eq!(&text[segment.offset..segment.offset + segment.raw.len()], segment.raw);
        }
    }

    #[test]
    fn test_trailing_separator_flags() {
        let flags: Vec<bool> = split("a b c").iter().map(|s| s.trailing_separator).collect();
        assert_eq!(flags, vec![true, true, false]);
    }

    #[test]
    fn test_tokenize_classifies() {
        let tokens = tokenize("hi <@!42> https://x.png");
        assert_eq!(tokens[0].kind(), &TokenKind::PlainRun);
        assert_eq!(
            tokens[1].kind(),
            &TokenKind::UserMention {
                id: "42".to_string()
            }
        );
        assert_eq!(tokens[2].kind(), &TokenKind::StaticImage);
        assert!(!tokens[2].has_trailing_separator());
    }
}
