use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelStoreError {
    #[error("Object store connection failed for bucket {bucket}: {message}")]
    Connection { bucket: String, message: String },

    #[error("Object not found: {key}")]
    ObjectMissing { key: String },

    #[error("Storage read failed for {key}: {message}")]
    StorageRead { key: String, message: String },

    #[error("Storage write failed for {key}: {message}")]
    StorageWrite { key: String, message: String },

    #[error("Model dictionary decode failed: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("Model path lookup failed for {cache_key}: {message}")]
    CacheLookup { cache_key: String, message: String },

    #[error("No model path registered under {cache_key}")]
    ModelPathMissing { cache_key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration value for {field} is invalid ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl ModelStoreError {
    /// True when the error means the requested thing does not exist, as
    /// opposed to a transient lookup or transport failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ModelStoreError::ObjectMissing { .. } | ModelStoreError::ModelPathMissing { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ModelStoreError>;
