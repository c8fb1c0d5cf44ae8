use crate::core::ModelPathCache;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-process model path cache for embedding processes that manage the
/// pointer themselves, and for tests. Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPathCache {
    paths: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryPathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_model_path(
        &self,
        cache_key: impl Into<String>,
        model_path: impl Into<String>,
    ) {
        let mut paths = self.paths.write().await;
        paths.insert(cache_key.into(), model_path.into());
    }

    pub async fn remove_model_path(&self, cache_key: &str) {
        let mut paths = self.paths.write().await;
        paths.remove(cache_key);
    }
}

#[async_trait]
impl ModelPathCache for InMemoryPathCache {
    async fn model_path(&self, cache_key: &str) -> Result<Option<String>> {
        let paths = self.paths.read().await;
        Ok(paths.get(cache_key).cloned())
    }
}
