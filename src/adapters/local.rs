use crate::core::ObjectStore;
use crate::utils::error::{ModelStoreError, Result};
use std::fs;
use std::path::Path;

/// Filesystem-backed object store for offline and debug use. Keys are
/// resolved relative to `base_path`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    base_path: String,
}

impl LocalObjectStore {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl ObjectStore for LocalObjectStore {
    async fn read_object(&self, key: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(key.trim_start_matches('/'));
        match fs::read(&full_path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(key, path = %full_path.display(), "object does not exist");
                Err(ModelStoreError::ObjectMissing {
                    key: key.to_string(),
                })
            }
            Err(e) => {
                tracing::error!(key, path = %full_path.display(), "read failed: {}", e);
                Err(ModelStoreError::StorageRead {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    async fn write_object(&self, key: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(key.trim_start_matches('/'));

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ModelStoreError::StorageWrite {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        }

        fs::write(&full_path, data).map_err(|e| {
            tracing::error!(key, path = %full_path.display(), "write failed: {}", e);
            ModelStoreError::StorageWrite {
                key: key.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(())
    }
}
