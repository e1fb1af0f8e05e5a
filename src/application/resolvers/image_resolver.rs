use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{ResolveContext, Resolution, TokenResolver};
use crate::application::services::ImageFetchService;
use crate::domain::entities::{CachePolicy, Fragment, Token, TokenKind};

/// Resolves `.gif` and `.png` links to inline images.
///
/// GIFs are requested with [`CachePolicy::ReturnCacheDataElseLoad`] and keep
/// every frame; PNGs use the protocol default and a single frame.
pub struct ImageResolver {
    images: Arc<ImageFetchService>,
}

impl ImageResolver {
    #[must_use]
    pub const fn new(images: Arc<ImageFetchService>) -> Self {
        Self { images }
    }
}

#[async_trait]
impl TokenResolver for ImageResolver {
    async fn resolve(&self, token: &Token, ctx: &ResolveContext) -> Resolution {
        let (policy, animated) = match token.kind() {
            TokenKind::AnimatedImage => (CachePolicy::ReturnCacheDataElseLoad, true),
            TokenKind::StaticImage => (CachePolicy::UseProtocolDefault, false),
            _ => return Resolution::Empty,
        };

        match self.images.load_inline(token.raw(), policy, animated).await {
            Ok(image) => Resolution::Single(Fragment::Image(image)),
            Err(e) => {
                debug!(
                    index = token.index(),
                    url = %token.raw(),
                    channel = ?ctx.channel_id,
                    error = %e,
                    "Inline image failed"
                );
                Resolution::Empty
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::entities::RequestKey;
    use crate::domain::ports::ResponseCachePort;
    use crate::domain::ports::mocks::{FakeFetcher, png_bytes};
    use crate::infrastructure::cache::MemoryResponseCache;
    use crate::infrastructure::image::ImageCrateDecoder;

    fn resolver(fetcher: FakeFetcher, cache: Arc<MemoryResponseCache>) -> ImageResolver {
        ImageResolver::new(Arc::new(ImageFetchService::new(
            Arc::new(fetcher),
            cache,
            Arc::new(ImageCrateDecoder),
            4,
            Duration::from_secs(3),
            40,
        )))
    }

    #[tokio::test]
    async fn test_gif_uses_return_cache_policy() {
        let url = "https://example.com/a.gif";
        let cache = Arc::new(MemoryResponseCache::new(8));
        let resolver = resolver(
            FakeFetcher::new().respond(url, png_bytes(8, 8)),
            Arc::clone(&cache),
        );
        let token = Token::new(0, 0, url, TokenKind::AnimatedImage, false);

        let resolution = resolver.resolve(&token, &ResolveContext::default()).await;
        assert!(matches!(resolution, Resolution::Single(Fragment::Image(_))));
        assert!(
            cache
                .get(&RequestKey::new(url, CachePolicy::ReturnCacheDataElseLoad))
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_missing_image_is_empty() {
        let resolver = resolver(FakeFetcher::new(), Arc::new(MemoryResponseCache::new(8)));
        let token = Token::new(0, 0, "https://example.com/gone.png", TokenKind::StaticImage, true);

        let resolution = resolver.resolve(&token, &ResolveContext::default()).await;
        assert_eq!(resolution, Resolution::Empty);
    }
}
