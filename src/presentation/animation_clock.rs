//! Frame clock for animated inline images.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

/// Advances a frame counter at a fixed rate while running.
///
/// The counter wraps at `frames`. The owner starts and stops the clock;
/// dropping it stops the ticker task.
pub struct AnimationClock {
    period: Duration,
    frames: u64,
    tick_tx: Arc<watch::Sender<u64>>,
    task: Option<JoinHandle<()>>,
}

impl AnimationClock {
    #[must_use]
    pub fn new(period: Duration, frames: u64) -> Self {
        let (tick_tx, _) = watch::channel(0);
        Self {
            period,
            frames: frames.max(1),
            tick_tx: Arc::new(tick_tx),
            task: None,
        }
    }

    /// Starts ticking on `runtime`. Does nothing if already running.
    pub fn start(&mut self, runtime: &Handle) {
        if self.is_running() {
            return;
        }

        let period = self.period;
        let frames = self.frames;
        let tick_tx = Arc::clone(&self.tick_tx);

        self.task = Some(runtime.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                tick_tx.send_modify(|frame| *frame = (*frame + 1) % frames);
            }
        }));
        debug!(period_ms = self.period.as_millis(), frames, "Animation clock started");
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Animation clock stopped");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Current frame counter.
    #[must_use]
    pub fn frame(&self) -> u64 {
        *self.tick_tx.borrow()
    }

    /// Receiver that changes on every tick.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tick_tx.subscribe()
    }
}

impl Drop for AnimationClock {
    fn drop(&mut self) {
        self.stop();
    }
}
