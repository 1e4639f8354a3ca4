use crate::{Error, ObjectId, Result};
use tokio_util::sync::CancellationToken;

/// Hands every identifier in `ids` to the worker pool, one at a time.
///
/// The channel has no buffer, so each send completes only once a worker is
/// ready to take the identifier. Cancellation is checked before every
/// handoff and raced against it; once it is visible no further identifier is
/// handed off.
///
/// Dropping `tx` on return closes the channel, which lets idle workers drain
/// and exit. This happens exactly once, after the last handoff or the abort.
///
/// # Errors
///
/// Returns [`Error::Cancelled`] if the run was cancelled before every
/// identifier was handed off, or [`Error::WorkerPanicked`] if every worker
/// disappeared without cancelling the run.
pub(crate) async fn dispatch<'a, I>(
    ids: I,
    tx: flume::Sender<ObjectId>,
    cancel: &CancellationToken,
) -> Result<u64>
where
    I: IntoIterator<Item = &'a ObjectId>,
{
    let mut handed_off = 0_u64;

    for &id in ids {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Dispatcher stopping after {handed_off} handoffs: cancelled");
                return Err(Error::Cancelled);
            }
            sent = tx.send_async(id) => {
                if sent.is_err() {
                    // Workers only leave while the sender is alive after
                    // cancelling, so a disconnect without cancellation means
                    // they died.
                    if cancel.is_cancelled() {
                        return Err(Error::Cancelled);
                    }
                    return Err(Error::WorkerPanicked {
                        context: "all workers exited before the set was dispatched".to_string(),
                    });
                }
                handed_off += 1;
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Dispatcher handed off {handed_off} ids");

    Ok(handed_off)
}
