//! Token classification rules.
//!
//! Rules are tried in a fixed order and the first match wins. Matching is
//! case-sensitive and never fails: anything unrecognized is a plain run.

use crate::domain::entities::TokenKind;

/// Length of a custom emote id, in characters.
pub const EMOTE_ID_LEN: usize = 18;

const TRACK_PREFIX: &str = "https://open.spotify.com/track/";
const MENTION_PREFIX: &str = "<@!";

/// Classifies a raw token.
#[must_use]
pub fn classify(raw: &str) -> TokenKind {
    if let Some(kind) = custom_emote(raw) {
        return kind;
    }
    if raw.starts_with("https") && raw.ends_with(".gif") {
        return TokenKind::AnimatedImage;
    }
    if raw.starts_with("https") && raw.ends_with(".png") {
        return TokenKind::StaticImage;
    }
    if raw.starts_with(TRACK_PREFIX) {
        return TokenKind::TrackLink;
    }
    if let Some(id) = raw
        .strip_prefix(MENTION_PREFIX)
        .and_then(|rest| rest.strip_suffix('>'))
    {
        return TokenKind::UserMention { id: id.to_string() };
    }
    TokenKind::PlainRun
}

fn custom_emote(raw: &str) -> Option<TokenKind> {
    let body = raw.strip_prefix('\\').unwrap_or(raw);
    let (animated, rest) = if let Some(rest) = body.strip_prefix("<a:") {
        (true, rest)
    } else {
        (false, body.strip_prefix("<:")?)
    };

    let inner = rest.strip_suffix('>')?;
    let id = match inner.rsplit_once(':') {
        Some((_, id)) => id,
        None => inner,
    };

    if id.chars().count() != EMOTE_ID_LEN {
        return None;
    }

    Some(TokenKind::CustomEmote {
        id: id.to_string(),
        animated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn emote(id: &str, animated: bool) -> TokenKind {
        TokenKind::CustomEmote {
            id: id.to_string(),
            animated,
        }
    }

    #[test_case("<:blob:123456789012345678>", emote("123456789012345678", false) ; "static emote")]
    #[test_case("<a:dance:123456789012345678>", emote("123456789012345678", true) ; "animated emote")]
    #[test_case("\\<:blob:123456789012345678>", emote("123456789012345678", false) ; "escaped emote")]
    #[test_case("\\<a:dance:123456789012345678>", emote("123456789012345678", true) ; "escaped animated emote")]
    #[test_case("<:blob:12345678901234567>", TokenKind::PlainRun ; "17 char id")]
    #[test_case("<:blob:1234567890123456789>", TokenKind::PlainRun ; "19 char id")]
    #[test_case("<:blob:123456789012345678", TokenKind::PlainRun ; "missing closing bracket")]
    #[test_case("<:abcdefghijklmnopqr>", emote("abcdefghijklmnopqr", false) ; "bare 18 char id")]
    #[test_case("<a:123456789012345678>", emote("123456789012345678", true) ; "bare animated id")]
    #[test_case("<:abcdefghijklmnopq>", TokenKind::PlainRun ; "bare 17 char id")]
    fn test_emote_boundaries(raw: &str, expected: TokenKind) {
        assert_eq!(classify(raw), expected);
    }

    #[test_case("https://x.png", TokenKind::StaticImage ; "png")]
    #[test_case("https://x.PNG", TokenKind::PlainRun ; "uppercase png")]
    #[test_case("http://x.png", TokenKind::PlainRun ; "plain http")]
    #[test_case("https://media.tenor.com/a.gif", TokenKind::AnimatedImage ; "gif")]
    #[test_case("https://x.gif?size=40", TokenKind::PlainRun ; "gif with query")]
    fn test_image_links(raw: &str, expected: TokenKind) {
        assert_eq!(classify(raw), expected);
    }

    #[test]
    fn test_track_link() {
        assert_eq!(
            classify("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC"),
            TokenKind::TrackLink
        );
        assert_eq!(
            classify("https://open.spotify.com/album/4uLU6hMCjMI75M1A2tKUQC"),
            TokenKind::PlainRun
        );
    }

    #[test]
    fn test_image_rule_wins_over_track_rule() {
        assert_eq!(
            classify("https://open.spotify.com/track/cover.png"),
            TokenKind::StaticImage
        );
    }

    #[test_case("<@!42>", Some("42") ; "mention")]
    #[test_case("<@!>", Some("") ; "empty id")]
    #[test_case("<@42>", None ; "no bang")]
    #[test_case("<@!42", None ; "unterminated")]
    fn test_mentions(raw: &str, id: Option<&str>) {
        let expected = id.map_or(TokenKind::PlainRun, |id| TokenKind::UserMention {
            id: id.to_string(),
        });
        assert_eq!(classify(raw), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("**bold**" ; "markdown")]
    #[test_case("<" ; "lone bracket")]
    fn test_plain_runs(raw: &str) {
        assert_eq!(classify(raw), TokenKind::PlainRun);
    }
}
