//! Progress reporting for deletion runs.
//!
//! The worker pool reports through a [`ProgressCounter`], which keeps an exact
//! tally of attempted removals and forwards every event to a [`Progress`]
//! sink. Rendering is left entirely to the sink.

use portable_atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Receives progress events from a deletion run.
///
/// Calls arrive concurrently from every worker, in no particular order.
pub trait Progress: Send + Sync {
    /// Called once before any work starts with the number of objects in the
    /// run.
    fn start(&self, _total: u64) {}

    /// `n` more removals were attempted.
    fn add(&self, n: u64);

    /// The run is over. Called exactly once per run, whatever the outcome.
    fn done(&self);
}

/// A [`Progress`] sink that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopProgress;

impl Progress for NoopProgress {
    fn add(&self, _n: u64) {}

    fn done(&self) {}
}

/// Shared, exact tally of attempted removals for one run.
///
/// Increments are relaxed: only the final total matters, and it is read after
/// every worker has been joined.
pub struct ProgressCounter {
    sink: Arc<dyn Progress>,
    attempted: AtomicU64,
    finished: AtomicBool,
}

impl ProgressCounter {
    /// Wraps `sink` and announces a run of `total` objects.
    pub fn start(sink: Arc<dyn Progress>, total: u64) -> Self {
        sink.start(total);
        Self {
            sink,
            attempted: AtomicU64::new(0),
            finished: AtomicBool::new(false),
        }
    }

    /// Records one attempted removal.
    pub fn add(&self, n: u64) {
        self.attempted.fetch_add(n, Ordering::Relaxed);
        self.sink.add(n);
    }

    /// Number of attempted removals recorded so far.
    pub fn attempted(&self) -> u64 {
        self.attempted.load(Ordering::Relaxed)
    }

    /// Forwards [`Progress::done`] to the sink. Only the first call has an
    /// effect.
    pub fn finish(&self) {
        if !self.finished.swap(true, Ordering::AcqRel) {
            self.sink.done();
        }
    }
}

impl Drop for ProgressCounter {
    fn drop(&mut self) {
        self.finish();
    }
}
