use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{ResolveContext, Resolution, TokenResolver};
use crate::domain::entities::{Fragment, Token};
use crate::domain::ports::TrackResolverPort;

/// Replaces a track link with the link returned by the lookup service.
pub struct TrackLinkResolver {
    tracks: Arc<dyn TrackResolverPort>,
}

impl TrackLinkResolver {
    #[must_use]
    pub fn new(tracks: Arc<dyn TrackResolverPort>) -> Self {
        Self { tracks }
    }
}

#[async_trait]
impl TokenResolver for TrackLinkResolver {
    async fn resolve(&self, token: &Token, ctx: &ResolveContext) -> Resolution {
        match self.tracks.resolve(token.raw()).await {
            Ok(mut link) => {
                if token.has_trailing_separator() {
                    link.push(' ');
                }
                Resolution::Single(Fragment::raw(link))
            }
            Err(e) => {
                debug!(
                    index = token.index(),
                    channel = ?ctx.channel_id,
                    error = %e,
                    "Track lookup failed"
                );
                Resolution::Empty
            }
        }
    }
}
