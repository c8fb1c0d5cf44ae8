pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::local::LocalObjectStore;
pub use crate::adapters::memory::InMemoryPathCache;
pub use crate::adapters::s3::{download_object, upload_file, S3ObjectStore};
pub use crate::config::ModelStoreConfig;
pub use crate::core::cache::ModelCache;
pub use crate::domain::model::ModelDictionary;
pub use crate::domain::ports::{ModelPathCache, ObjectStore};
pub use crate::utils::error::{ModelStoreError, Result};
