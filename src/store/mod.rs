//! File storage behind the `/files/` routes
//!
//! Handlers talk to a [`FileStore`] rather than the filesystem directly.
//! [`DirectoryStore`] serves a directory on disk, [`MemoryStore`] keeps
//! everything in a map.

use std::future::Future;
use std::path::PathBuf;

pub mod directory;
pub mod memory;

pub use directory::DirectoryStore;
pub use memory::MemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unable to read file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to write file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Named blobs addressed by a single path segment.
///
/// A missing file is `Ok(None)` from [`FileStore::read`], never an error.
/// Writes replace the whole file; concurrent writes to one name race and
/// the last to finish wins.
pub trait FileStore: Send + Sync + 'static {
    fn read(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StoreError>> + Send;

    fn write(
        &self,
        name: &str,
        contents: &[u8],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
