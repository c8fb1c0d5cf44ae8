use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Trained model parameters for one entity, decoded from a stored blob.
///
/// The blob is a JSON object; no structure beyond that is assumed here,
/// consumers interpret the entries themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelDictionary {
    pub entries: HashMap<String, serde_json::Value>,
}

impl ModelDictionary {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let dict = serde_json::from_slice(data)?;
        Ok(dict)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_decode_from_bytes() {
        let data = br#"{"weights": [0.1, 0.2], "labels": ["city", "date"]}"#;
        let dict = ModelDictionary::from_bytes(data).unwrap();

        assert_eq!(dict.len(), 2);
        assert_eq!(
            dict.get("labels").unwrap(),
            &serde_json::json!(["city", "date"])
        );
    }

    #[test]
    fn test_decode_rejects_non_object_blob() {
        assert!(ModelDictionary::from_bytes(b"[1, 2, 3]").is_err());
        assert!(ModelDictionary::from_bytes(b"not json at all").is_err());
    }

    #[test]
    fn test_decode_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(br#"{"transition_matrix": {"a": 1}}"#)
            .unwrap();

        let dict = ModelDictionary::from_file(temp_file.path()).unwrap();
        assert!(dict.get("transition_matrix").is_some());
    }

    #[test]
    fn test_decode_from_missing_file_is_io_error() {
        let result = ModelDictionary::from_file("/nonexistent/model.json");
        assert!(matches!(
            result,
            Err(crate::utils::error::ModelStoreError::Io(_))
        ));
    }
}
