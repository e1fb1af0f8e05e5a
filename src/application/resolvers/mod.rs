//! Per-kind token resolvers.
//!
//! A resolver never fails: errors are logged and turned into
//! [`Resolution::Empty`], which still counts towards job completion.

pub mod emote_resolver;
pub mod image_resolver;
pub mod mention_resolver;
pub mod plain_text_resolver;
pub mod track_resolver;

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::{Fragment, MemberDirectory, Token, TokenKind};

pub use emote_resolver::EmoteResolver;
pub use image_resolver::ImageResolver;
pub use mention_resolver::MentionResolver;
pub use plain_text_resolver::PlainTextResolver;
pub use track_resolver::TrackLinkResolver;

/// Outcome of resolving one token.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Nothing to show; still counts as a result.
    Empty,
    /// One unit.
    Single(Fragment),
    /// Several units in display order.
    Multiple(Vec<Fragment>),
}

impl Resolution {
    /// Number of result slots this resolution fills.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        match self {
            Self::Empty | Self::Single(_) => 1,
            Self::Multiple(parts) => parts.len().max(1),
        }
    }

    /// Per-slot fragments, `None` for an empty slot.
    #[must_use]
    pub fn into_slots(self) -> Vec<Option<Fragment>> {
        match self {
            Self::Empty => vec![None],
            Self::Single(fragment) => vec![Some(fragment)],
            Self::Multiple(parts) if parts.is_empty() => vec![None],
            Self::Multiple(parts) => parts.into_iter().map(Some).collect(),
        }
    }
}

/// Per-job inputs shared by every resolver.
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// Display names for mentions.
    pub members: Arc<MemberDirectory>,
    /// Opaque channel identifier, used only for log context.
    pub channel_id: Option<String>,
}

/// Resolves tokens of one kind into renderable fragments.
#[async_trait]
pub trait TokenResolver: Send + Sync {
    /// Resolves the token. Never fails.
    async fn resolve(&self, token: &Token, ctx: &ResolveContext) -> Resolution;
}

/// The resolver for every token kind.
#[derive(Clone)]
pub struct ResolverSet {
    pub emote: Arc<dyn TokenResolver>,
    pub image: Arc<dyn TokenResolver>,
    pub track: Arc<dyn TokenResolver>,
    pub mention: Arc<dyn TokenResolver>,
    pub plain: Arc<dyn TokenResolver>,
}

impl ResolverSet {
    /// Picks the resolver for a token kind.
    #[must_use]
    pub fn for_kind(&self, kind: &TokenKind) -> Arc<dyn TokenResolver> {
        let resolver = match kind {
            TokenKind::CustomEmote { .. } => &self.emote,
            TokenKind::AnimatedImage | TokenKind::StaticImage => &self.image,
            TokenKind::TrackLink => &self.track,
            TokenKind::UserMention { .. } => &self.mention,
            TokenKind::PlainRun => &self.plain,
        };
        Arc::clone(resolver)
    }
}
