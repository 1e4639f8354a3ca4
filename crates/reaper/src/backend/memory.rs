use super::{Backend, BackendError};
use crate::{FileType, Handle, IdSet};
use parking_lot::Mutex;
use std::collections::HashSet;

/// A [`Backend`] that keeps handles in memory.
///
/// Useful for tests, benchmarks and dry runs. Removing an absent handle fails
/// with [`BackendError::NotFound`].
#[derive(Debug, Default)]
pub struct MemoryBackend {
    objects: Mutex<HashSet<Handle>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with every id in `ids` under
    /// `file_type`.
    pub fn with_objects(file_type: FileType, ids: &IdSet) -> Self {
        let backend = Self::new();
        backend
            .objects
            .lock()
            .extend(ids.iter().map(|&id| Handle::new(file_type, id)));
        backend
    }

    /// Stores a handle, returning `false` if it was already present.
    pub fn insert(&self, handle: Handle) -> bool {
        self.objects.lock().insert(handle)
    }

    pub fn contains(&self, handle: &Handle) -> bool {
        self.objects.lock().contains(handle)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }
}

impl Backend for MemoryBackend {
    async fn remove(&self, handle: &Handle) -> Result<(), BackendError> {
        if self.objects.lock().remove(handle) {
            Ok(())
        } else {
            Err(BackendError::NotFound { handle: *handle })
        }
    }
}
