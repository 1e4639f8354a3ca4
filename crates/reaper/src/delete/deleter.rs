use super::{
    DeleteConfig, DeleteSummary, FailurePolicy, context::RunContext, dispatcher::dispatch,
    worker::worker_loop,
};
use crate::{
    Backend, Error, FileType, IdSet, NoopPrinter, NoopProgress, Printer, Progress,
    ProgressCounter, Result,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Removes sets of objects from a [`Backend`] with a fixed pool of workers.
///
/// A `Deleter` is cheap to reuse: every call to [`delete_files`] or
/// [`delete_files_checked`] builds its own channel, progress counter and
/// cancellation scope, and tears them down before returning.
///
/// The token passed to [`with_cancellation`] (or returned by
/// [`cancellation_token`]) is the caller's handle for stopping runs from the
/// outside, e.g. on Ctrl+C or a timeout. A failing worker only cancels its
/// own run, never that token.
///
/// # Example
///
/// ```no_run
/// use reaper::{Deleter, FileType, IdSet, MemoryBackend};
/// use std::sync::Arc;
///
/// # async fn run(ids: IdSet) -> reaper::Result<()> {
/// let backend = Arc::new(MemoryBackend::with_objects(FileType::Pack, &ids));
/// let deleter = Deleter::new(backend).with_workers(4);
///
/// // Fail fast: stop on the first error.
/// let summary = deleter.delete_files_checked(&ids, FileType::Pack).await?;
/// assert_eq!(summary.removed, ids.len() as u64);
/// # Ok(())
/// # }
/// ```
///
/// [`delete_files`]: Deleter::delete_files
/// [`delete_files_checked`]: Deleter::delete_files_checked
/// [`with_cancellation`]: Deleter::with_cancellation
/// [`cancellation_token`]: Deleter::cancellation_token
pub struct Deleter<B> {
    backend: Arc<B>,
    printer: Arc<dyn Printer>,
    progress: Arc<dyn Progress>,
    config: DeleteConfig,
    cancel: CancellationToken,
}

impl<B: Backend> Deleter<B> {
    /// Creates a deleter with the default configuration, silent diagnostics
    /// and no progress display.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            printer: Arc::new(NoopPrinter),
            progress: Arc::new(NoopProgress),
            config: DeleteConfig::default(),
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: DeleteConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.config.num_workers = num_workers;
        self
    }

    #[must_use]
    pub fn with_printer(mut self, printer: Arc<dyn Printer>) -> Self {
        self.printer = printer;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn Progress>) -> Self {
        self.progress = progress;
        self
    }

    /// Uses `cancel` as the external stop signal for every run.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns a handle that stops in-progress and future runs when
    /// cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Removes every object in `ids`, continuing past failures.
    ///
    /// Each failed removal is reported as a warning and counted as attempted.
    /// The run never returns an error: an external cancellation or a broken
    /// configuration only shows up in the returned summary.
    pub async fn delete_files(&self, ids: &IdSet, file_type: FileType) -> DeleteSummary {
        let (summary, _err) = self.run(ids, file_type, FailurePolicy::BestEffort).await;

        #[cfg(feature = "tracing")]
        {
            if let Some(err) = _err {
                tracing::warn!("Best-effort deletion of {file_type} files ended early: {err}");
            }
        }

        summary
    }

    /// Removes every object in `ids`, stopping at the first failure.
    ///
    /// No new removal starts once a failure or an external cancellation has
    /// been observed; removals already in flight finish and are counted.
    ///
    /// # Errors
    ///
    /// - [`Error::Removal`] for the first removal that failed.
    /// - [`Error::Cancelled`] if the run was cancelled from outside.
    /// - [`Error::InvalidConfig`] if the configuration is unusable.
    /// - [`Error::WorkerPanicked`] if a worker task died.
    pub async fn delete_files_checked(
        &self,
        ids: &IdSet,
        file_type: FileType,
    ) -> Result<DeleteSummary> {
        match self.run(ids, file_type, FailurePolicy::FailFast).await {
            (summary, None) => Ok(summary),
            (_, Some(err)) => Err(err),
        }
    }

    /// Runs one deletion with the given policy.
    ///
    /// Returns the tally together with the run's single error, if any.
    #[cfg_attr(feature = "tracing", tracing::instrument(
        skip_all,
        fields(file_type = %file_type, count = ids.len(), policy = ?policy)
    ))]
    pub async fn run(
        &self,
        ids: &IdSet,
        file_type: FileType,
        policy: FailurePolicy,
    ) -> (DeleteSummary, Option<Error>) {
        let total = ids.len() as u64;
        let progress = ProgressCounter::start(Arc::clone(&self.progress), total);
        let ctx = Arc::new(RunContext::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.printer),
            progress,
            file_type,
            policy,
            self.cancel.child_token(),
        ));

        if let Err(e) = self.config.validate() {
            ctx.fail(e);
        } else if ctx.cancel.is_cancelled() {
            ctx.fail(Error::Cancelled);
        } else {
            self.drive(ids, &ctx).await;
        }

        ctx.progress.finish();

        let summary = DeleteSummary {
            file_type,
            policy,
            total,
            attempted: ctx.progress.attempted(),
            removed: ctx.removed(),
            failed: ctx.failed(),
            cancelled: ctx.cancel.is_cancelled(),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!("Deletion finished: {summary}");

        (summary, ctx.take_error())
    }

    /// Spawns the worker pool, dispatches `ids` and waits for every worker.
    async fn drive(&self, ids: &IdSet, ctx: &Arc<RunContext<B>>) {
        let (tx, rx) = flume::bounded(0);

        let workers: Vec<_> = (0..self.config.num_workers)
            .map(|worker_id| tokio::spawn(worker_loop(worker_id, rx.clone(), Arc::clone(ctx))))
            .collect();
        // Workers hold the only receivers: if they all exit, the dispatcher
        // sees a disconnect instead of blocking forever.
        drop(rx);

        if let Err(e) = dispatch(ids, tx, &ctx.cancel).await {
            ctx.fail(e);
        }

        for joined in futures::future::join_all(workers).await {
            if let Err(e) = joined {
                ctx.fail(e.into());
            }
        }
    }
}
