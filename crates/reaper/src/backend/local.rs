use super::{Backend, BackendError};
use crate::{FileType, Handle};
use std::{io, path::PathBuf};

/// A [`Backend`] over a repository directory on the local filesystem.
///
/// Objects are laid out as:
///
/// - `config` for [`FileType::Config`]
/// - `data/<first two hex chars>/<id>` for [`FileType::Pack`]
/// - `<type dir>/<id>` for every other type
#[derive(Clone, Debug)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Opens the repository rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` does not exist or is not a directory.
    pub async fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        let meta = tokio::fs::metadata(&root).await?;
        if !meta.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Opened local repository at {}", root.display());

        Ok(Self { root })
    }

    /// Returns the on-disk location of `handle`.
    pub fn path_for(&self, handle: &Handle) -> PathBuf {
        match handle.file_type {
            FileType::Config => self.root.join(FileType::Config.dir_name()),
            FileType::Pack => {
                let name = handle.id.encode();
                let name = name.as_str();
                self.root
                    .join(FileType::Pack.dir_name())
                    .join(&name[..2])
                    .join(name)
            }
            other => self
                .root
                .join(other.dir_name())
                .join(handle.id.encode().as_str()),
        }
    }
}

impl Backend for LocalBackend {
    async fn remove(&self, handle: &Handle) -> Result<(), BackendError> {
        let path = self.path_for(handle);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(BackendError::NotFound { handle: *handle })
            }
            Err(source) => Err(BackendError::Io {
                handle: *handle,
                source,
            }),
        }
    }
}
