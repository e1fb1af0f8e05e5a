use async_trait::async_trait;
use ratatui::style::Style;
use ratatui::text::Span;

use super::{ResolveContext, Resolution, TokenResolver};
use crate::domain::entities::{Fragment, Token, TokenKind};

/// Renders `<@!id>` as `@name ` in the link style.
pub struct MentionResolver {
    unknown_label: String,
    style: Style,
}

impl MentionResolver {
    #[must_use]
    pub fn new(unknown_label: impl Into<String>, style: Style) -> Self {
        Self {
            unknown_label: unknown_label.into(),
            style,
        }
    }

    /// Builds the mention fragment without going through the async trait.
    #[must_use]
    pub fn mention(&self, id: &str, ctx: &ResolveContext) -> Fragment {
        let name = ctx
            .members
            .display_name(id)
            .unwrap_or(&self.unknown_label);
        Fragment::Text(vec![Span::styled(format!("@{name} "), self.style)])
    }
}

#[async_trait]
impl TokenResolver for MentionResolver {
    async fn resolve(&self, token: &Token, ctx: &ResolveContext) -> Resolution {
        match token.kind() {
            TokenKind::UserMention { id } => Resolution::Single(self.mention(id, ctx)),
            _ => Resolution::Empty,
        }
    }
}
