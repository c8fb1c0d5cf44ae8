use crate::utils::error::{ModelStoreError, Result};
use crate::utils::validation::{
    validate_bucket_name, validate_bucket_region, validate_non_empty_string, validate_range,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

fn default_path_cache_prefix() -> String {
    "models:path:".to_string()
}

fn default_operation_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStoreConfig {
    pub bucket: String,
    pub bucket_region: Option<String>,
    pub endpoint_url: Option<String>,
    #[serde(default = "default_path_cache_prefix")]
    pub path_cache_prefix: String,
    #[serde(default = "default_operation_timeout_secs")]
    pub operation_timeout_secs: u64,
}

impl ModelStoreConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bucket: env::var("MODEL_BUCKET").map_err(|_| ModelStoreError::MissingConfigError {
                field: "MODEL_BUCKET".to_string(),
            })?,
            bucket_region: env::var("MODEL_BUCKET_REGION").ok(),
            endpoint_url: env::var("MODEL_STORE_ENDPOINT_URL").ok(),
            path_cache_prefix: env::var("MODEL_PATH_CACHE_PREFIX")
                .unwrap_or_else(|_| default_path_cache_prefix()),
            operation_timeout_secs: env::var("MODEL_STORE_TIMEOUT_SECS")
                .unwrap_or_else(|_| default_operation_timeout_secs().to_string())
                .parse()
                .unwrap_or_else(|_| default_operation_timeout_secs()),
        })
    }

    /// One-shot configuration for tooling that already knows the bucket.
    pub fn for_bucket(bucket: impl Into<String>, bucket_region: Option<String>) -> Self {
        Self {
            bucket: bucket.into(),
            bucket_region,
            endpoint_url: None,
            path_cache_prefix: default_path_cache_prefix(),
            operation_timeout_secs: default_operation_timeout_secs(),
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ModelStoreError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ModelStoreError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MODEL_BUCKET})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

impl Validate for ModelStoreConfig {
    fn validate(&self) -> Result<()> {
        validate_bucket_name("bucket", &self.bucket)?;

        if let Some(region) = &self.bucket_region {
            validate_bucket_region("bucket_region", region)?;
        }

        if let Some(endpoint_url) = &self.endpoint_url {
            validate_url("endpoint_url", endpoint_url)?;
        }

        validate_non_empty_string("path_cache_prefix", &self.path_cache_prefix)?;
        validate_range(
            "operation_timeout_secs",
            self.operation_timeout_secs,
            1,
            300,
        )?;

        Ok(())
    }
}
