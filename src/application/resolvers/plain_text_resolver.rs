use std::sync::Arc;

use async_trait::async_trait;

use super::{ResolveContext, Resolution, TokenResolver};
use crate::application::services::TextFormatter;
use crate::domain::entities::{Fragment, Token};

/// Formats plain runs. A run followed by a space resolves to two units,
/// the formatted run and the separator.
pub struct PlainTextResolver {
    formatter: Arc<TextFormatter>,
}

impl PlainTextResolver {
    #[must_use]
    pub const fn new(formatter: Arc<TextFormatter>) -> Self {
        Self { formatter }
    }

    /// Synchronous form used by the pipeline.
    #[must_use]
    pub fn format(&self, token: &Token) -> Resolution {
        if token.is_empty() {
            return if token.has_trailing_separator() {
                Resolution::Single(Fragment::raw(" "))
            } else {
                Resolution::Empty
            };
        }

        let run = Fragment::Text(self.formatter.format_run_or_raw(token.raw()));
        if token.has_trailing_separator() {
            Resolution::Multiple(vec![run, Fragment::raw(" ")])
        } else {
            Resolution::Single(run)
        }
    }
}

#[async_trait]
impl TokenResolver for PlainTextResolver {
    async fn resolve(&self, token: &Token, _ctx: &ResolveContext) -> Resolution {
        self.format(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::TokenKind;
    use test_case::test_case;

    fn token(raw: &str, trailing: bool) -> Token {
        Token::new(0, 0, raw, TokenKind::PlainRun, trailing)
    }

    #[test_case("hello", true, &["hello", " "] ; "run with separator splits")]
    #[test_case("hello", false, &["hello"] ; "last run")]
    #[test_case("", true, &[" "] ; "empty segment keeps spacing")]
    #[test_case("`open", false, &["`open"] ; "malformed markup falls back")]
    fn test_format(raw: &str, trailing: bool, expected: &[&str]) {
        let resolver = PlainTextResolver::new(Arc::new(TextFormatter::new()));
        let texts: Vec<String> = resolver
            .format(&token(raw, trailing))
            .into_slots()
            .into_iter()
            .flatten()
            .map(|f| f.plain_text())
            .collect();
        assert_eq!(texts, expected);
    }

    #[test]
    fn test_empty_last_segment_is_empty() {
        let resolver = PlainTextResolver::new(Arc::new(TextFormatter::new()));
        assert_eq!(resolver.format(&token("", false)), Resolution::Empty);
    }
}
