//! Collects resolved units for one job and completes it exactly once.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use tracing::{trace, warn};

use crate::application::resolvers::Resolution;
use crate::domain::entities::{Fragment, ResolvedUnit, StyledText, UnitKey};

/// Receives the assembled text when the job completes.
pub type CompletionCallback = Box<dyn FnOnce(StyledText) + Send>;

/// Lifecycle of a job's result set.
#[derive(Debug)]
pub enum JobState {
    /// Waiting for results. `units` holds one entry per recorded slot,
    /// `None` for slots that resolved to nothing.
    Pending {
        expected: usize,
        units: BTreeMap<UnitKey, Option<Fragment>>,
    },
    /// The callback has fired; further records are ignored.
    Complete,
}

struct Inner {
    state: JobState,
    callback: Option<CompletionCallback>,
}

/// Thread-safe result collector for one resolution job.
///
/// Completion is evaluated after every record, under the same lock that
/// updates the counts. The callback runs after the lock is released.
pub struct Aggregator {
    inner: Mutex<Inner>,
}

impl Aggregator {
    #[must_use]
    pub fn new(expected: usize, on_complete: CompletionCallback) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: JobState::Pending {
                    expected,
                    units: BTreeMap::new(),
                },
                callback: Some(on_complete),
            }),
        }
    }

    /// Raises the expected count for a token that produced extra units.
    pub fn expand(&self, additional: usize) {
        let mut inner = self.inner.lock();
        match &mut inner.state {
            JobState::Pending { expected, .. } => *expected += additional,
            JobState::Complete => warn!(additional, "Expand after completion ignored"),
        }
    }

    /// Records one slot. Returns true if this record completed the job.
    pub fn record(&self, key: UnitKey, fragment: Option<Fragment>) -> bool {
        let mut inner = self.inner.lock();
        Self::insert(&mut inner, key, fragment);
        Self::finish_locked(inner)
    }

    /// Records every slot of a token's resolution, growing the expected
    /// count first so the job cannot complete between the parts.
    pub fn record_resolution(&self, index: usize, resolution: Resolution) -> bool {
        let mut inner = self.inner.lock();
        let extra = resolution.slot_count() - 1;
        if extra > 0
            && let JobState::Pending { expected, .. } = &mut inner.state
        {
            *expected += extra;
        }
        for (part, fragment) in resolution.into_slots().into_iter().enumerate() {
            Self::insert(&mut inner, UnitKey::new(index, part), fragment);
        }
        Self::finish_locked(inner)
    }

    fn insert(inner: &mut Inner, key: UnitKey, fragment: Option<Fragment>) {
        match &mut inner.state {
            JobState::Pending { units, .. } => {
                if units.contains_key(&key) {
                    warn!(key = %key, "Duplicate result ignored");
                } else {
                    trace!(key = %key, empty = fragment.is_none(), "Recorded result");
                    units.insert(key, fragment);
                }
            }
            JobState::Complete => warn!(key = %key, "Result after completion ignored"),
        }
    }

    fn finish_locked(mut inner: parking_lot::MutexGuard<'_, Inner>) -> bool {
        let ready = matches!(
            &inner.state,
            JobState::Pending { expected, units } if units.len() >= *expected
        );
        if !ready {
            return false;
        }

        let state = std::mem::replace(&mut inner.state, JobState::Complete);
        let callback = inner.callback.take();
        drop(inner);

        let JobState::Pending { units, .. } = state else {
            return false;
        };
        let text = StyledText::from_units(
            units
                .into_iter()
                .filter_map(|(key, fragment)| fragment.map(|f| ResolvedUnit::new(key, f)))
                .collect(),
        );
        if let Some(callback) = callback {
            callback(text);
        }
        true
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.inner.lock().state, JobState::Complete)
    }

    /// Slots recorded so far; zero once complete.
    #[must_use]
    pub fn received(&self) -> usize {
        match &self.inner.lock().state {
            JobState::Pending { units, .. } => units.len(),
            JobState::Complete => 0,
        }
    }

    /// Current expected count; zero once complete.
    #[must_use]
    pub fn expected(&self) -> usize {
        match &self.inner.lock().state {
            JobState::Pending { expected, .. } => *expected,
            JobState::Complete => 0,
        }
    }

    /// Whether any slot of the token at `index` has been recorded.
    #[must_use]
    pub fn is_resolved(&self, index: usize) -> bool {
        match &self.inner.lock().state {
            JobState::Pending { units, .. } => units
                .range(UnitKey::first(index)..=UnitKey::new(index, usize::MAX))
                .next()
                .is_some(),
            JobState::Complete => true,
        }
    }
}
