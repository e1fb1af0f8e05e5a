//! Tokenize, classify, resolve and reassemble one message.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, warn};

use super::aggregator::{Aggregator, CompletionCallback};
use super::image_fetch_service::ImageFetchService;
use super::text_formatter::TextFormatter;
use super::tokenizer::tokenize;
use crate::application::resolvers::{
    EmoteResolver, ImageResolver, MentionResolver, PlainTextResolver, ResolveContext, Resolution,
    ResolverSet, TrackLinkResolver,
};
use crate::domain::entities::{Fragment, MemberDirectory, StyledText};
use crate::domain::ports::{HttpFetchPort, ImageDecoderPort, ResponseCachePort, TrackResolverPort};
use crate::infrastructure::config::PipelineConfig;

/// Long-lived collaborators, owned by the application root.
#[derive(Clone)]
pub struct PipelineServices {
    pub fetcher: Arc<dyn HttpFetchPort>,
    pub cache: Arc<dyn ResponseCachePort>,
    pub tracks: Arc<dyn TrackResolverPort>,
    pub decoder: Arc<dyn ImageDecoderPort>,
    pub formatter: Arc<TextFormatter>,
}

/// Input of one resolution job.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    pub text: String,
    pub members: Arc<MemberDirectory>,
    pub channel_id: Option<String>,
}

impl RenderRequest {
    #[must_use]
    pub fn new(text: impl Into<String>, members: Arc<MemberDirectory>) -> Self {
        Self {
            text: text.into(),
            members,
            channel_id: None,
        }
    }

    #[must_use]
    pub fn with_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }
}

/// Runs resolution jobs.
pub struct RenderPipeline {
    resolvers: ResolverSet,
    formatter: Arc<TextFormatter>,
}

impl RenderPipeline {
    #[must_use]
    pub fn new(services: PipelineServices, config: &PipelineConfig) -> Self {
        let images = Arc::new(ImageFetchService::new(
            services.fetcher,
            services.cache,
            services.decoder,
            config.max_concurrent_fetches,
            config.fetch_timeout(),
            config.inline_image_size,
        ));

        let resolvers = ResolverSet {
            emote: Arc::new(EmoteResolver::new(
                Arc::clone(&images),
                config.emote_cdn_base.clone(),
                config.emote_size,
            )),
            image: Arc::new(ImageResolver::new(images)),
            track: Arc::new(TrackLinkResolver::new(services.tracks)),
            mention: Arc::new(MentionResolver::new(
                config.unknown_user_label.clone(),
                services.formatter.link_style(),
            )),
            plain: Arc::new(PlainTextResolver::new(Arc::clone(&services.formatter))),
        };

        Self::with_resolvers(resolvers, services.formatter)
    }

    #[must_use]
    pub const fn with_resolvers(resolvers: ResolverSet, formatter: Arc<TextFormatter>) -> Self {
        Self {
            resolvers,
            formatter,
        }
    }

    /// Formats the whole text as one run on `runtime` and hands the result
    /// to `on_complete`.
    pub fn spawn_direct(
        &self,
        runtime: &Handle,
        text: String,
        on_complete: CompletionCallback,
    ) -> JoinHandle<()> {
        let formatter = Arc::clone(&self.formatter);
        runtime.spawn(async move { on_complete(format_direct(&formatter, &text)) })
    }

    /// Starts a job on `runtime`. `on_complete` fires exactly once when
    /// every token has reported, unless the returned task is aborted first.
    pub fn spawn_job(
        &self,
        runtime: &Handle,
        request: RenderRequest,
        on_complete: CompletionCallback,
    ) -> JoinHandle<()> {
        let resolvers = self.resolvers.clone();

        runtime.spawn(async move {
            let tokens = tokenize(&request.text);
            let aggregator = Arc::new(Aggregator::new(tokens.len(), on_complete));
            let ctx = ResolveContext {
                members: request.members,
                channel_id: request.channel_id,
            };
            debug!(tokens = tokens.len(), channel = ?ctx.channel_id, "Starting resolution job");

            let mut pending = JoinSet::new();
            let mut task_index = HashMap::new();

            for token in tokens {
                let resolver = resolvers.for_kind(token.kind());
                let index = token.index();

                if token.kind().needs_network() {
                    let aggregator = Arc::clone(&aggregator);
                    let ctx = ctx.clone();
                    let abort = pending.spawn(async move {
                        let resolution = resolver.resolve(&token, &ctx).await;
                        aggregator.record_resolution(token.index(), resolution);
                    });
                    task_index.insert(abort.id(), index);
                } else {
                    let resolution = resolver.resolve(&token, &ctx).await;
                    aggregator.record_resolution(index, resolution);
                }
            }

            while let Some(joined) = pending.join_next().await {
                if let Err(e) = joined
                    && e.is_panic()
                {
                    let index = task_index.get(&e.id()).copied();
                    warn!(index = ?index, "Resolver panicked");
                    if let Some(index) = index {
                        aggregator.record_resolution(index, Resolution::Empty);
                    }
                }
            }
        })
    }

    /// Runs a job and waits for its result. Returns `None` if the job task
    /// ended without completing.
    pub async fn render(&self, request: RenderRequest) -> Option<StyledText> {
        let (tx, rx) = oneshot::channel();
        let _job = self.spawn_job(
            &Handle::current(),
            request,
            Box::new(move |text: StyledText| {
                let _ = tx.send(text);
            }),
        );
        rx.await.ok()
    }
}

/// Formats the whole text as one run, without tokenizing.
fn format_direct(formatter: &TextFormatter, text: &str) -> StyledText {
    StyledText::single(Fragment::Text(formatter.format_run_or_raw(text)))
}
