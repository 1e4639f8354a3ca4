use crate::Handle;

/// Failure reported by a [`Backend`](crate::Backend) for a single removal.
#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    /// The object does not exist in the backend.
    #[error("{handle} does not exist")]
    NotFound { handle: Handle },

    /// The backend hit an I/O error while removing the object.
    #[error("removing {handle} failed: {source}")]
    Io {
        handle: Handle,
        #[source]
        source: std::io::Error,
    },

    /// The backend cannot serve requests right now.
    #[error("backend unavailable: {reason}")]
    Unavailable { reason: String },
}

impl BackendError {
    /// Returns `true` if the object was already absent.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
