use super::FailurePolicy;
use crate::{Backend, Error, FileType, Printer, ProgressCounter};
use parking_lot::Mutex;
use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// State shared by the dispatcher and every worker of one run.
///
/// Created when the run starts and dropped when it returns.
pub(crate) struct RunContext<B> {
    pub backend: Arc<B>,
    pub printer: Arc<dyn Printer>,
    pub progress: ProgressCounter,
    pub file_type: FileType,
    pub policy: FailurePolicy,
    /// Child of the deleter's token: raising it stops this run only.
    pub cancel: CancellationToken,
    first_error: Mutex<Option<Error>>,
    removed: AtomicU64,
    failed: AtomicU64,
}

impl<B: Backend> RunContext<B> {
    pub fn new(
        backend: Arc<B>,
        printer: Arc<dyn Printer>,
        progress: ProgressCounter,
        file_type: FileType,
        policy: FailurePolicy,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            backend,
            printer,
            progress,
            file_type,
            policy,
            cancel,
            first_error: Mutex::new(None),
            removed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Records `err` if no error was captured yet, then raises cancellation.
    ///
    /// Capture and raise happen under the same lock, so a sibling that
    /// observes the cancellation can never record its error first. Returns
    /// `true` if `err` became the run's error.
    pub fn fail(&self, err: Error) -> bool {
        let mut slot = self.first_error.lock();
        let first = slot.is_none();
        if first {
            *slot = Some(err);
        } else {
            #[cfg(feature = "tracing")]
            tracing::debug!("Discarding error after first failure: {err}");
        }
        self.cancel.cancel();
        first
    }

    pub fn take_error(&self) -> Option<Error> {
        self.first_error.lock().take()
    }

    pub fn record_removed(&self) {
        self.removed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn removed(&self) -> u64 {
        self.removed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}
