use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::store::{FileStore, StoreError};

/// In-memory store. Clones share the same files.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

impl FileStore for MemoryStore {
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.files.read().await.get(name).cloned())
    }

    async fn write(&self, name: &str, contents: &[u8]) -> Result<(), StoreError> {
        self.files
            .write()
            .await
            .insert(name.to_string(), contents.to_vec());
        Ok(())
    }
}
