use crate::config::ModelStoreConfig;
use crate::core::ObjectStore;
use crate::utils::error::{ModelStoreError, Result};
use aws_config::timeout::TimeoutConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::Client as S3Client;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Builds a region-aware client from the configuration and resolves the
    /// named bucket. Fails with `Connection` when the bucket does not exist
    /// or the credentials are rejected.
    pub async fn connect(config: &ModelStoreConfig) -> Result<Self> {
        let client = build_client(config).await;
        let store = Self::new(client, config.bucket.clone());
        store.verify_bucket().await?;
        Ok(store)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub async fn verify_bucket(&self) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                tracing::error!(bucket = %self.bucket, "failed to resolve bucket: {}", message);
                ModelStoreError::Connection {
                    bucket: self.bucket.clone(),
                    message,
                }
            })?;
        Ok(())
    }
}

impl ObjectStore for S3ObjectStore {
    async fn read_object(&self, key: &str) -> Result<Vec<u8>> {
        let key = key.trim_start_matches('/');

        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        let resp = match resp {
            Ok(resp) => resp,
            Err(err) => {
                let message = DisplayErrorContext(&err).to_string();
                return Err(match err.into_service_error() {
                    GetObjectError::NoSuchKey(_) => {
                        tracing::warn!(bucket = %self.bucket, key, "object does not exist");
                        ModelStoreError::ObjectMissing {
                            key: key.to_string(),
                        }
                    }
                    _ => {
                        tracing::error!(bucket = %self.bucket, key, "read failed: {}", message);
                        ModelStoreError::StorageRead {
                            key: key.to_string(),
                            message,
                        }
                    }
                });
            }
        };

        let data = resp.body.collect().await.map_err(|e| {
            tracing::error!(bucket = %self.bucket, key, "failed to collect object body: {}", e);
            ModelStoreError::StorageRead {
                key: key.to_string(),
                message: e.to_string(),
            }
        })?;

        let bytes = data.into_bytes().to_vec();
        tracing::debug!(bucket = %self.bucket, key, bytes = bytes.len(), "object read from s3");
        Ok(bytes)
    }

    async fn write_object(&self, key: &str, data: &[u8]) -> Result<()> {
        let key = key.trim_start_matches('/');

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(data.to_vec().into())
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                tracing::error!(bucket = %self.bucket, key, "write failed: {}", message);
                ModelStoreError::StorageWrite {
                    key: key.to_string(),
                    message,
                }
            })?;

        tracing::debug!(bucket = %self.bucket, key, bytes = data.len(), "object written to s3");
        Ok(())
    }
}

async fn build_client(config: &ModelStoreConfig) -> S3Client {
    let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;

    let mut builder = aws_sdk_s3::config::Builder::from(&shared)
        .force_path_style(true)
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(Duration::from_secs(config.operation_timeout_secs))
                .build(),
        );

    if let Some(region) = &config.bucket_region {
        builder = builder.region(Region::new(region.clone()));
    }
    if let Some(endpoint_url) = &config.endpoint_url {
        builder = builder.endpoint_url(endpoint_url.clone());
    }

    S3Client::from_conf(builder.build())
}

/// One-shot download: connect, read the object at `key`, return its bytes.
pub async fn download_object(
    bucket_name: &str,
    bucket_region: Option<&str>,
    key: &str,
) -> Result<Vec<u8>> {
    let config = ModelStoreConfig::for_bucket(bucket_name, bucket_region.map(String::from));
    let store = S3ObjectStore::connect(&config).await?;
    store.read_object(key).await
}

/// One-shot upload of a local file to `address` in the bucket.
/// WARNING! The object will be overwritten if it exists.
pub async fn upload_file(
    bucket_name: &str,
    address: &str,
    local_filepath: &Path,
    bucket_region: Option<&str>,
) -> Result<()> {
    let config = ModelStoreConfig::for_bucket(bucket_name, bucket_region.map(String::from));
    let store = S3ObjectStore::connect(&config).await?;

    let data = std::fs::read(local_filepath)?;
    store.write_object(address, &data).await?;

    tracing::info!(
        bucket = bucket_name,
        address,
        file = %local_filepath.display(),
        "uploaded local file to s3"
    );
    Ok(())
}
