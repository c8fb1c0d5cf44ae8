use crate::core::{ModelPathCache, ObjectStore};
use crate::domain::model::ModelDictionary;
use crate::utils::error::{ModelStoreError, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct EntityState {
    loaded_model_path: Option<String>,
    model_dict: Option<Arc<ModelDictionary>>,
}

/// Registry of loaded model dictionaries, one state slot per entity name.
///
/// The embedding process holds exactly one `ModelCache` (typically in an
/// `Arc`) for its whole lifetime; entity slots are created lazily on first
/// request and never torn down. The current pointer for an entity is read
/// from the path cache under the key `path_cache_prefix + entity_name`, and
/// the blob is re-downloaded only when that pointer changes or nothing is
/// cached yet.
pub struct ModelCache<S, P> {
    store: S,
    paths: P,
    path_cache_prefix: String,
    entries: Mutex<HashMap<String, Arc<Mutex<EntityState>>>>,
}

impl<S: ObjectStore, P: ModelPathCache> ModelCache<S, P> {
    pub fn new(store: S, paths: P, path_cache_prefix: impl Into<String>) -> Self {
        Self {
            store,
            paths,
            path_cache_prefix: path_cache_prefix.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the current model dictionary for `entity_name`, downloading
    /// it only when the stored pointer changed or nothing is cached yet.
    ///
    /// With `local_override` the dictionary is decoded directly from that
    /// file, replacing the cached one unconditionally; the path cache and
    /// the object store are not consulted. The override also clears the
    /// stored pointer so a later remote call cannot pair it with the
    /// overridden dictionary.
    ///
    /// The check-fetch-store sequence runs under a per-entity lock: at most
    /// one download is in flight per entity, and both state fields are
    /// updated together only after a fully successful fetch + decode.
    pub async fn get_or_load(
        &self,
        entity_name: &str,
        local_override: Option<&Path>,
    ) -> Result<Arc<ModelDictionary>> {
        let entry = self.entry(entity_name).await;
        let mut state = entry.lock().await;

        if let Some(path) = local_override {
            let dict = Arc::new(ModelDictionary::from_file(path)?);
            state.model_dict = Some(Arc::clone(&dict));
            state.loaded_model_path = None;
            tracing::info!(
                entity = entity_name,
                path = %path.display(),
                "model dictionary loaded from local file"
            );
            return Ok(dict);
        }

        let cache_key = format!("{}{}", self.path_cache_prefix, entity_name);
        let current_path = self.paths.model_path(&cache_key).await?.ok_or_else(|| {
            tracing::warn!(entity = entity_name, %cache_key, "no model path registered");
            ModelStoreError::ModelPathMissing { cache_key }
        })?;

        if state.loaded_model_path.as_deref() == Some(current_path.as_str()) {
            if let Some(dict) = &state.model_dict {
                tracing::debug!(entity = entity_name, "model dictionary served from cache");
                return Ok(Arc::clone(dict));
            }
        }

        let bytes = self.store.read_object(&current_path).await?;
        let dict = Arc::new(ModelDictionary::from_bytes(&bytes)?);
        tracing::info!(
            entity = entity_name,
            model_path = %current_path,
            "model dictionary refreshed from object store"
        );
        state.model_dict = Some(Arc::clone(&dict));
        state.loaded_model_path = Some(current_path);
        Ok(dict)
    }

    /// The pointer the cached dictionary was loaded from, if any.
    pub async fn loaded_path(&self, entity_name: &str) -> Option<String> {
        let entries = self.entries.lock().await;
        let entry = entries.get(entity_name)?;
        let state = entry.lock().await;
        state.loaded_model_path.clone()
    }

    async fn entry(&self, entity_name: &str) -> Arc<Mutex<EntityState>> {
        let mut entries = self.entries.lock().await;
        Arc::clone(entries.entry(entity_name.to_string()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPathCache;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::NamedTempFile;

    #[derive(Clone, Default)]
    struct CountingStore {
        objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        reads: Arc<AtomicUsize>,
    }

    impl CountingStore {
        fn new() -> Self {
            Self::default()
        }

        async fn put(&self, key: &str, data: &[u8]) {
            let mut objects = self.objects.lock().await;
            objects.insert(key.to_string(), data.to_vec());
        }

        fn read_count(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl ObjectStore for CountingStore {
        async fn read_object(&self, key: &str) -> Result<Vec<u8>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            let objects = self.objects.lock().await;
            objects
                .get(key)
                .cloned()
                .ok_or_else(|| ModelStoreError::ObjectMissing {
                    key: key.to_string(),
                })
        }

        async fn write_object(&self, key: &str, data: &[u8]) -> Result<()> {
            let mut objects = self.objects.lock().await;
            objects.insert(key.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct FailingPathCache;

    #[async_trait::async_trait]
    impl ModelPathCache for FailingPathCache {
        async fn model_path(&self, cache_key: &str) -> Result<Option<String>> {
            Err(ModelStoreError::CacheLookup {
                cache_key: cache_key.to_string(),
                message: "connection refused".to_string(),
            })
        }
    }

    async fn setup() -> (CountingStore, InMemoryPathCache) {
        let store = CountingStore::new();
        store.put("models/city/v1.json", br#"{"version": 1}"#).await;
        store.put("models/city/v2.json", br#"{"version": 2}"#).await;

        let paths = InMemoryPathCache::new();
        paths
            .set_model_path("models:path:city", "models/city/v1.json")
            .await;

        (store, paths)
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let (store, paths) = setup().await;
        let cache = ModelCache::new(store.clone(), paths, "models:path:");

        let first = cache.get_or_load("city", None).await.unwrap();
        let second = cache.get_or_load("city", None).await.unwrap();

        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.read_count(), 1);
    }

    #[tokio::test]
    async fn test_pointer_change_triggers_exactly_one_refetch() {
        let (store, paths) = setup().await;
        let cache = ModelCache::new(store.clone(), paths.clone(), "models:path:");

        let v1 = cache.get_or_load("city", None).await.unwrap();
        assert_eq!(v1.get("version").unwrap(), &serde_json::json!(1));

        paths
            .set_model_path("models:path:city", "models/city/v2.json")
            .await;

        let v2 = cache.get_or_load("city", None).await.unwrap();
        assert_eq!(v2.get("version").unwrap(), &serde_json::json!(2));
        assert_eq!(store.read_count(), 2);
        assert_eq!(
            cache.loaded_path("city").await.as_deref(),
            Some("models/city/v2.json")
        );

        // unchanged pointer afterwards stays cached
        cache.get_or_load("city", None).await.unwrap();
        assert_eq!(store.read_count(), 2);
    }

    #[tokio::test]
    async fn test_local_override_skips_path_cache_and_store() {
        let store = CountingStore::new();
        // a path cache that always errors proves it is never consulted
        let cache = ModelCache::new(store.clone(), FailingPathCache, "models:path:");

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(br#"{"version": "local"}"#).unwrap();

        let dict = cache
            .get_or_load("city", Some(temp_file.path()))
            .await
            .unwrap();

        assert_eq!(dict.get("version").unwrap(), &serde_json::json!("local"));
        assert_eq!(store.read_count(), 0);
        assert_eq!(cache.loaded_path("city").await, None);
    }

    #[tokio::test]
    async fn test_missing_pointer_is_a_typed_error() {
        let (store, paths) = setup().await;
        let cache = ModelCache::new(store, paths, "models:path:");

        let err = cache.get_or_load("unknown", None).await.unwrap_err();
        assert!(matches!(err, ModelStoreError::ModelPathMissing { .. }));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_path_cache_failure_propagates() {
        let store = CountingStore::new();
        let cache = ModelCache::new(store, FailingPathCache, "models:path:");

        let err = cache.get_or_load("city", None).await.unwrap_err();
        assert!(matches!(err, ModelStoreError::CacheLookup { .. }));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_previous_state_intact() {
        let (store, paths) = setup().await;
        let cache = ModelCache::new(store.clone(), paths.clone(), "models:path:");

        let v1 = cache.get_or_load("city", None).await.unwrap();

        // point at a blob that fails to decode
        store.put("models/city/broken.json", b"not json").await;
        paths
            .set_model_path("models:path:city", "models/city/broken.json")
            .await;

        let err = cache.get_or_load("city", None).await.unwrap_err();
        assert!(matches!(err, ModelStoreError::Deserialization(_)));

        // pointer and dictionary still describe the last successful load
        assert_eq!(
            cache.loaded_path("city").await.as_deref(),
            Some("models/city/v1.json")
        );
        paths
            .set_model_path("models:path:city", "models/city/v1.json")
            .await;
        let again = cache.get_or_load("city", None).await.unwrap();
        assert!(Arc::ptr_eq(&v1, &again));
    }

    #[tokio::test]
    async fn test_entities_are_cached_independently() {
        let (store, paths) = setup().await;
        store.put("models/date/v1.json", br#"{"version": 9}"#).await;
        paths
            .set_model_path("models:path:date", "models/date/v1.json")
            .await;

        let cache = ModelCache::new(store.clone(), paths, "models:path:");

        let city = cache.get_or_load("city", None).await.unwrap();
        let date = cache.get_or_load("date", None).await.unwrap();

        assert_ne!(city, date);
        assert_eq!(store.read_count(), 2);
    }
}
