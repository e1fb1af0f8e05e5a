use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{ResolveContext, Resolution, TokenResolver};
use crate::application::services::ImageFetchService;
use crate::domain::entities::{CachePolicy, Fragment, Token, TokenKind};
use crate::infrastructure::image::emote_url;

/// Resolves custom emotes to their CDN icon.
pub struct EmoteResolver {
    images: Arc<ImageFetchService>,
    cdn_base: String,
    size: u32,
}

impl EmoteResolver {
    #[must_use]
    pub fn new(images: Arc<ImageFetchService>, cdn_base: impl Into<String>, size: u32) -> Self {
        Self {
            images,
            cdn_base: cdn_base.into(),
            size,
        }
    }
}

#[async_trait]
impl TokenResolver for EmoteResolver {
    async fn resolve(&self, token: &Token, ctx: &ResolveContext) -> Resolution {
        let TokenKind::CustomEmote { id, .. } = token.kind() else {
            return Resolution::Empty;
        };
        let url = emote_url(&self.cdn_base, id, self.size);

        match self
            .images
            .load_inline(&url, CachePolicy::UseProtocolDefault, false)
            .await
        {
            Ok(image) => Resolution::Single(Fragment::Image(image)),
            Err(e) => {
                debug!(
                    index = token.index(),
                    emote = %id,
                    channel = ?ctx.channel_id,
                    error = %e,
                    "Emote failed"
                );
                Resolution::Empty
            }
        }
    }
}
