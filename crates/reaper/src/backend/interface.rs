use super::BackendError;
use crate::Handle;
use core::future::Future;

/// The storage boundary of the deletion core.
///
/// A backend only has to remove a single object named by a [`Handle`].
/// Implementations must tolerate concurrent calls with distinct handles: the
/// worker pool issues up to `num_workers` removals at once and performs no
/// locking around them.
///
/// Latency and failure reasons are opaque to the caller; a returned error is
/// only reported, never retried.
pub trait Backend: Send + Sync + 'static {
    /// Removes the object addressed by `handle`.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the object could not be removed.
    fn remove(&self, handle: &Handle) -> impl Future<Output = Result<(), BackendError>> + Send;
}
