//! Persisted set of pinned hashes.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct IndexFile {
    #[serde(default)]
    pinned: BTreeSet<String>,
}

/// The pinned set, stored as a JSON document.
///
/// Every call reads the file afresh; there is no in-memory cache to go stale.
#[derive(Debug)]
pub(crate) struct PinIndex {
    path: PathBuf,
}

impl PinIndex {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the pinned set. A missing index file is an empty set.
    pub(crate) fn load(&self) -> Result<BTreeSet<String>, StoreError> {
        Ok(self.read()?.pinned)
    }

    /// Add `hash`; returns false if it was already pinned.
    pub(crate) fn insert(&self, hash: &str) -> Result<bool, StoreError> {
        let mut index = self.read()?;
        if !index.pinned.insert(hash.to_string()) {
            return Ok(false);
        }
        self.write(&index)?;
        Ok(true)
    }

    fn read(&self) -> Result<IndexFile, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(IndexFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, index: &IndexFile) -> Result<(), StoreError> {
        // Replace the index atomically.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(index)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let index = PinIndex::new(dir.path().join("index.json"));
        assert!(index.load().unwrap().is_empty());
    }

    #[test]
    fn test_insert_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let index = PinIndex::new(dir.path().join("index.json"));
        assert!(index.insert("abc").unwrap());
        assert!(!index.insert("abc").unwrap());
        assert_eq!(index.load().unwrap().len(), 1);
    }

    #[test]
    fn test_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let index = PinIndex::new(path.clone());
        index.insert("bb").unwrap();
        index.insert("aa").unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({ "pinned": ["aa", "bb"] }));
    }

    #[test]
    fn test_manual_unpin_is_seen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let index = PinIndex::new(path.clone());
        index.insert("aa").unwrap();
        index.insert("bb").unwrap();
        fs::write(&path, r#"{ "pinned": ["bb"] }"#).unwrap();
        let pinned = index.load().unwrap();
        assert!(!pinned.contains("aa"));
        assert!(pinned.contains("bb"));
    }

    #[test]
    fn test_corrupt_index_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        fs::write(&path, "not json").unwrap();
        let index = PinIndex::new(path);
        assert!(matches!(index.load(), Err(StoreError::Index(_))));
    }
}
