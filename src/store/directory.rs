use std::io::ErrorKind;
use std::path::PathBuf;

use crate::store::{FileStore, StoreError};

/// Serves files from a single directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl FileStore for DirectoryStore {
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(name);

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "File not found");
                Ok(None)
            }
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    async fn write(&self, name: &str, contents: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(name);

        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| StoreError::Write { path: path.clone(), source })?;

        tracing::debug!(path = %path.display(), bytes = contents.len(), "File written");
        Ok(())
    }
}
