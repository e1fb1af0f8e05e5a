/// Classification of a single message token.
///
/// Variants carry whatever the classifier extracted from the raw text so
/// resolvers never re-parse the token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Custom emote reference such as `<:name:123456789012345678>`.
    CustomEmote {
        /// Emote snowflake (always 18 characters).
        id: String,
        /// Whether the emote was written with the `a:` animated prefix.
        animated: bool,
    },
    /// `https` link ending in `.gif`.
    AnimatedImage,
    /// `https` link ending in `.png`.
    StaticImage,
    /// Track link that resolves to a universal playback link.
    TrackLink,
    /// User mention such as `<@!42>`.
    UserMention {
        /// Mentioned user id.
        id: String,
    },
    /// Anything else; formatted as inline rich text.
    PlainRun,
}

impl TokenKind {
    /// Short label used in logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CustomEmote { .. } => "custom_emote",
            Self::AnimatedImage => "animated_image",
            Self::StaticImage => "static_image",
            Self::TrackLink => "track_link",
            Self::UserMention { .. } => "user_mention",
            Self::PlainRun => "plain_run",
        }
    }

    /// Returns true if resolving this kind may hit the network.
    #[must_use]
    pub const fn needs_network(&self) -> bool {
        matches!(
            self,
            Self::CustomEmote { .. } | Self::AnimatedImage | Self::StaticImage | Self::TrackLink
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A classified, position-tagged piece of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    index: usize,
    offset: usize,
    raw: String,
    kind: TokenKind,
    trailing_separator: bool,
}

#[allow(missing_docs)]
impl Token {
    #[must_use]
    pub fn new(
        index: usize,
        offset: usize,
        raw: impl Into<String>,
        kind: TokenKind,
        trailing_separator: bool,
    ) -> Self {
        Self {
            index,
            offset,
            raw: raw.into(),
            kind,
            trailing_separator,
        }
    }

    /// Position of the token among all tokens of the message.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Byte offset of the token in the source text.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub const fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// True when a space separated this token from the next one.
    #[must_use]
    pub const fn has_trailing_separator(&self) -> bool {
        self.trailing_separator
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}
