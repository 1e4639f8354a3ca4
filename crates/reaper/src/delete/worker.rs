use super::{FailurePolicy, context::RunContext};
use crate::{Backend, Error, Handle, ObjectId};
use std::sync::Arc;

/// Worker task that removes identifiers received from the dispatcher.
///
/// Each iteration first checks the run's cancellation token, then waits for
/// the next identifier. A removal that has started is always awaited to
/// completion, even if the run is cancelled meanwhile, and its outcome is
/// counted.
///
/// # Behavior
///
/// - Success: emits a verbose trace and advances progress.
/// - Failure: always emits a warning naming the handle, then
///   - [`FailurePolicy::BestEffort`]: advances progress and continues.
///   - [`FailurePolicy::FailFast`]: records the error, cancels the run and
///     exits without advancing progress.
/// - Exits when the channel is closed and drained, or on cancellation.
pub(crate) async fn worker_loop<B: Backend>(
    _worker_id: usize,
    rx: flume::Receiver<ObjectId>,
    ctx: Arc<RunContext<B>>,
) {
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {_worker_id} started");

    loop {
        let id = tokio::select! {
            biased;
            () = ctx.cancel.cancelled() => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Worker {_worker_id} observed cancellation");
                break;
            }
            next = rx.recv_async() => match next {
                Ok(id) => id,
                // Closed and drained.
                Err(_) => break,
            },
        };

        let handle = Handle::new(ctx.file_type, id);
        match ctx.backend.remove(&handle).await {
            Ok(()) => {
                ctx.record_removed();
                ctx.printer.verbose(format_args!("removed {handle}"));
                ctx.progress.add(1);
            }
            Err(source) => {
                ctx.record_failed();
                ctx.printer.warn(format_args!(
                    "unable to remove {handle} from the repository"
                ));

                #[cfg(feature = "tracing")]
                tracing::debug!("Worker {_worker_id} failed to remove {handle}: {source}");

                match ctx.policy {
                    FailurePolicy::BestEffort => ctx.progress.add(1),
                    FailurePolicy::FailFast => {
                        ctx.fail(Error::Removal { handle, source });
                        break;
                    }
                }
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {_worker_id} stopped");
}
