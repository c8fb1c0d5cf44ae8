use crate::utils::error::Result;
use async_trait::async_trait;

/// Whole-object blob storage. Reads return the raw bytes; writes overwrite
/// any existing object at the same key.
pub trait ObjectStore: Send + Sync {
    fn read_object(&self, key: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_object(
        &self,
        key: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Fast key-value lookup that holds the currently active model path per
/// entity. `Ok(None)` means the key is absent; transport failures map to
/// `ModelStoreError::CacheLookup`.
#[async_trait]
pub trait ModelPathCache: Send + Sync {
    async fn model_path(&self, cache_key: &str) -> Result<Option<String>>;
}
