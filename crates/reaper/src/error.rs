//! Error types for deletion runs.
//!
//! A run produces at most one [`Error`]: the first failure observed among the
//! dispatcher and the workers. Everything that happens after that is logged
//! and dropped.
//!
//! ## Error Cases
//! - `Removal`: the backend refused or failed to remove one object.
//! - `Cancelled`: the run was stopped before every object was attempted.
//! - `WorkerPanicked`: a dispatcher or worker task died.
//! - `InvalidConfig`: the run was configured with unusable settings.

use crate::{BackendError, Handle};

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Unified error type for deletion runs.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The backend could not remove `handle`.
    #[error("unable to remove {handle} from the repository: {source}")]
    Removal {
        handle: Handle,
        #[source]
        source: BackendError,
    },

    /// The run was cancelled before it completed.
    #[error("deletion cancelled")]
    Cancelled,

    /// A background task panicked or was aborted.
    #[error("worker task failed: {context}")]
    WorkerPanicked { context: String },

    /// The run configuration is unusable.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl Error {
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The handle whose removal failed, if this is a removal failure.
    pub const fn handle(&self) -> Option<&Handle> {
        match self {
            Self::Removal { handle, .. } => Some(handle),
            _ => None,
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::WorkerPanicked {
            context: err.to_string(),
        }
    }
}
