//! Runs resolution jobs off the UI thread and delivers the newest result.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::aggregator::CompletionCallback;
use super::pipeline::{RenderPipeline, RenderRequest};
use crate::domain::entities::StyledText;

/// A finished result, tagged with the generation that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedText {
    pub generation: u64,
    pub text: StyledText,
}

/// Owns the current job for one view.
///
/// Each submission bumps the generation and aborts the previous job.
/// Results are sent to the UI channel only if their generation is still
/// the latest when they complete.
pub struct RenderCoordinator {
    pipeline: Arc<RenderPipeline>,
    runtime: Handle,
    generation: Arc<AtomicU64>,
    current: Mutex<Option<JoinHandle<()>>>,
    ui_tx: mpsc::UnboundedSender<RenderedText>,
}

impl RenderCoordinator {
    /// Creates a coordinator and the receiver the UI loop drains.
    #[must_use]
    pub fn new(
        pipeline: Arc<RenderPipeline>,
        runtime: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<RenderedText>) {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        (
            Self {
                pipeline,
                runtime,
                generation: Arc::new(AtomicU64::new(0)),
                current: Mutex::new(None),
                ui_tx,
            },
            ui_rx,
        )
    }

    /// Starts resolving `request`, superseding any job in flight.
    /// Returns the new generation.
    pub fn submit(&self, request: RenderRequest) -> u64 {
        let mut current = self.current.lock();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(previous) = current.take() {
            previous.abort();
            trace!(generation, "Aborted superseded job");
        }

        let deliver = self.delivery(generation);
        let job = if request.text.contains('`') {
            debug!(generation, "Rendering code text directly");
            self.pipeline.spawn_direct(&self.runtime, request.text, deliver)
        } else {
            self.pipeline.spawn_job(&self.runtime, request, deliver)
        };
        *current = Some(job);
        generation
    }

    /// Drops the job in flight without starting a new one.
    pub fn cancel(&self) {
        let mut current = self.current.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(previous) = current.take() {
            previous.abort();
        }
    }

    #[must_use]
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn delivery(&self, generation: u64) -> CompletionCallback {
        let latest = Arc::clone(&self.generation);
        let ui_tx = self.ui_tx.clone();
        Box::new(move |text: StyledText| {
            if latest.load(Ordering::SeqCst) != generation {
                debug!(generation, "Discarding stale result");
                return;
            }
            if ui_tx.send(RenderedText { generation, text }).is_err() {
                debug!(generation, "UI receiver closed");
            }
        })
    }
}

impl Drop for RenderCoordinator {
    fn drop(&mut self) {
        if let Some(job) = self.current.get_mut().take() {
            job.abort();
        }
    }
}
