pub mod cache;

pub use crate::domain::model::ModelDictionary;
pub use crate::domain::ports::{ModelPathCache, ObjectStore};
pub use crate::utils::error::Result;
