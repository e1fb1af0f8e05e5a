//! View state for one message's resolved content.

use std::sync::Arc;

use ratatui::text::Line;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use super::animation_clock::AnimationClock;
use crate::application::services::{RenderCoordinator, RenderPipeline, RenderRequest, RenderedText};
use crate::domain::entities::{MemberDirectory, StyledText};
use crate::infrastructure::config::PipelineConfig;

/// Holds the latest resolved text of a message and re-resolves it when the
/// source text or the member directory changes. Owns the animation clock for its inline images.
pub struct MessageView {
    coordinator: RenderCoordinator,
    updates: mpsc::UnboundedReceiver<RenderedText>,
    members: Arc<MemberDirectory>,
    channel_id: Option<String>,
    source: Option<String>,
    submitted_members: Option<Arc<MemberDirectory>>,
    rendered: Option<RenderedText>,
    clock: AnimationClock,
    runtime: Handle,
}

impl MessageView {
    #[must_use]
    pub fn new(pipeline: Arc<RenderPipeline>, config: &PipelineConfig, runtime: Handle) -> Self {
        let (coordinator, updates) = RenderCoordinator::new(pipeline, runtime.clone());
        Self {
            coordinator,
            updates,
            members: Arc::new(MemberDirectory::new()),
            channel_id: None,
            source: None,
            submitted_members: None,
            rendered: None,
            clock: AnimationClock::new(config.animation_interval(), config.animation_frames),
            runtime,
        }
    }

    #[must_use]
    pub fn with_members(mut self, members: Arc<MemberDirectory>) -> Self {
        self.members = members;
        self
    }

    #[must_use]
    pub fn with_channel(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }

    /// Sets the message text. Starts a new resolution only when the text or
    /// the member directory differs from the last submission.
    pub fn set_source(&mut self, text: &str) -> Option<u64> {
        if self.is_current(text) {
            return None;
        }
        self.source = Some(text.to_string());
        Some(self.submit(text.to_string()))
    }

    /// Replaces the member directory and re-resolves the current source if
    /// the directory changed.
    pub fn set_members(&mut self, members: Arc<MemberDirectory>) -> Option<u64> {
        self.members = members;
        let text = self.source.clone()?;
        if self.is_current(&text) {
            return None;
        }
        debug!(members = self.members.len(), "Member directory changed, re-resolving");
        Some(self.submit(text))
    }

    fn is_current(&self, text: &str) -> bool {
        self.source.as_deref() == Some(text)
            && self
                .submitted_members
                .as_ref()
                .is_some_and(|m| Arc::ptr_eq(m, &self.members) || **m == *self.members)
    }

    fn submit(&mut self, text: String) -> u64 {
        self.submitted_members = Some(Arc::clone(&self.members));
        let mut request = RenderRequest::new(text, Arc::clone(&self.members));
        request.channel_id.clone_from(&self.channel_id);
        self.coordinator.submit(request)
    }

    /// Applies every result already delivered. Returns true if the view
    /// changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(rendered) = self.updates.try_recv() {
            changed |= self.apply(rendered);
        }
        changed
    }

    /// Waits for the next delivered result and applies it.
    pub async fn next_update(&mut self) -> Option<bool> {
        let rendered = self.updates.recv().await?;
        Some(self.apply(rendered))
    }

    /// Installs a result if it belongs to the current generation.
    pub fn apply(&mut self, rendered: RenderedText) -> bool {
        if rendered.generation != self.coordinator.current_generation() {
            trace!(generation = rendered.generation, "Ignoring stale render");
            return false;
        }

        if rendered.text.has_animation() {
            self.clock.start(&self.runtime);
        } else {
            self.clock.stop();
        }
        self.rendered = Some(rendered);
        true
    }

    #[must_use]
    pub fn text(&self) -> Option<&StyledText> {
        self.rendered.as_ref().map(|r| &r.text)
    }

    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Frame counter for animated images.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.clock.frame()
    }

    #[must_use]
    pub const fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// Line to draw at the current animation frame, empty until the first
    /// result arrives.
    #[must_use]
    pub fn to_line(&self) -> Line<'static> {
        let tick = self.frame();
        self.text()
            .map(|text| text.to_line_at(tick))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::Duration;

    use image::codecs::gif::GifEncoder;
    use image::{Delay, Frame, RgbaImage};

    use super::*;
    use crate::application::services::pipeline::tests::pipeline_with;
    use crate::domain::ports::mocks::FakeFetcher;

    fn view(fetcher: FakeFetcher) -> MessageView {
        MessageView::new(
            Arc::new(pipeline_with(Arc::new(fetcher))),
            &PipelineConfig::default(),
            Handle::current(),
        )
        .with_members(Arc::new(MemberDirectory::new().with_member("1", "Ada")))
    }

    fn gif_bytes() -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        {
            let mut encoder = GifEncoder::new(&mut out);
            let frames = (0..3u8).map(|i| {
                Frame::from_parts(
                    RgbaImage::from_pixel(4, 4, image::Rgba([i * 80, 0, 0, 255])),
                    0,
                    0,
                    Delay::from_numer_denom_ms(50, 1),
                )
            });
            encoder.encode_frames(frames).unwrap();
        }
        out.into_inner()
    }

    #[tokio::test]
    async fn test_set_source_resolves() {
        let mut view = view(FakeFetcher::new());
        assert!(view.set_source("hi <@!1>").is_some());

        assert_eq!(view.next_update().await, Some(true));
        assert_eq!(view.text().map(StyledText::plain_text).as_deref(), Some("hi @Ada "));
        assert!(!view.clock().is_running());
    }

    #[tokio::test]
    async fn test_same_source_is_not_resubmitted() {
        let mut view = view(FakeFetcher::new());
        assert!(view.set_source("same").is_some());
        assert!(view.set_source("same").is_none());
    }

    #[tokio::test]
    async fn test_member_change_re_resolves_mentions() {
        let mut view = MessageView::new(
            Arc::new(pipeline_with(Arc::new(FakeFetcher::new()))),
            &PipelineConfig::default(),
            Handle::current(),
        );
        view.set_source("hi <@!1>");
        view.next_update().await;
        assert_eq!(
            view.text().map(StyledText::plain_text).as_deref(),
            Some("hi @Unknown user ")
        );

        let members = Arc::new(MemberDirectory::new().with_member("1", "Ada"));
        assert!(view.set_members(Arc::clone(&members)).is_some());
        assert_eq!(view.next_update().await, Some(true));
        assert_eq!(view.text().map(StyledText::plain_text).as_deref(), Some("hi @Ada "));

        assert!(view.set_members(members).is_none());
        assert!(view.set_source("hi <@!1>").is_none());
    }

    #[tokio::test]
    async fn test_members_before_source_do_not_submit() {
        let mut view = view(FakeFetcher::new());
        assert!(view.set_members(Arc::new(MemberDirectory::new())).is_none());
        assert!(view.source().is_none());
    }

    #[tokio::test]
    async fn test_stale_result_is_ignored() {
        let mut view = view(FakeFetcher::new());
        let first = view.set_source("one").unwrap_or_default();
        view.set_source("two");

        let stale = RenderedText {
            generation: first,
            text: StyledText::default(),
        };
        assert!(!view.apply(stale));
        assert!(view.text().is_none());
    }

    #[tokio::test]
    async fn test_animated_result_starts_clock() {
        let url = "https://example.com/party.gif";
        let mut view = view(FakeFetcher::new().respond(url, gif_bytes()));
        view.set_source(url);

        assert_eq!(view.next_update().await, Some(true));
        assert!(view.text().is_some_and(StyledText::has_animation));
        assert!(view.clock().is_running());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(view.frame() > 0);
        let line = view.to_line();
        assert!(line.spans[0].content.starts_with("[img 4x4 "));
        assert!(line.spans[0].content.ends_with("/3]"));

        view.set_source("plain now");
        view.next_update().await;
        assert!(!view.clock().is_running());
    }

    #[tokio::test]
    async fn test_poll_drains_ready_results() {
        let mut view = view(FakeFetcher::new());
        view.set_source("a `b` c");
        assert!(!view.poll());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(view.poll());
        assert_eq!(view.text().map(StyledText::len), Some(1));
    }
}
