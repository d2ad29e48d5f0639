//! Content-addressed storage for text blobs.
//!
//! Blobs live under `<root>/store/<hh>/<hash>`, where `hash` is the lower-case
//! hex SHA-256 of the blob's UTF-8 bytes and `hh` its first two characters.
//! The pinned set is kept separately in `<root>/index.json`.
//!
//! Blobs are write-once: storing the same content twice yields the same hash
//! and leaves the existing file untouched. The store assumes a single writer
//! per root and does no locking.

mod pin_index;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::StoreError;
use pin_index::PinIndex;

/// Largest blob the store accepts, in bytes.
pub const MAX_SIZE: usize = 4 * 1024 * 1024;

const STORE_DIR: &str = "store";
const INDEX_FILE: &str = "index.json";

/// A content-addressed blob store rooted at a directory.
#[derive(Debug)]
pub struct ContentStore {
    root: PathBuf,
    store_dir: PathBuf,
    pins: PinIndex,
}

impl ContentStore {
    /// Open the store at `root`, creating its directories if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        let store_dir = root.join(STORE_DIR);
        fs::create_dir_all(&store_dir)?;
        let pins = PinIndex::new(root.join(INDEX_FILE));
        debug!(root = %root.display(), "opened content store");
        Ok(Self {
            root,
            store_dir,
            pins,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `content` and return its hash.
    pub fn put(&self, content: &str) -> Result<String, StoreError> {
        let size = content.len();
        if size > MAX_SIZE {
            return Err(StoreError::TooLarge {
                size,
                limit: MAX_SIZE,
            });
        }
        let hash = hash_content(content);
        let path = self.blob_path(&hash);
        if path.exists() {
            debug!(%hash, "blob already stored");
            return Ok(hash);
        }
        if let Some(shard) = path.parent() {
            fs::create_dir_all(shard)?;
        }
        fs::write(&path, content)?;
        debug!(%hash, size, "stored blob");
        Ok(hash)
    }

    /// Store raw bytes, which must be UTF-8 text.
    pub fn put_bytes(&self, bytes: &[u8]) -> Result<String, StoreError> {
        let content =
            std::str::from_utf8(bytes).map_err(|e| StoreError::InvalidInput(e.to_string()))?;
        self.put(content)
    }

    /// Fetch the blob stored under `hash`, if any.
    pub fn get(&self, hash: &str) -> Result<Option<String>, StoreError> {
        if !is_hash(hash) {
            return Ok(None);
        }
        let path = self.blob_path(hash);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    pub fn contains(&self, hash: &str) -> bool {
        is_hash(hash) && self.blob_path(hash).exists()
    }

    /// Mark `hash` as pinned.
    ///
    /// The blob does not have to exist: a pin may be recorded before the
    /// content it refers to is stored.
    pub fn pin(&self, hash: &str) -> Result<(), StoreError> {
        if self.pins.insert(hash)? {
            debug!(%hash, "pinned");
        }
        Ok(())
    }

    pub fn is_pinned(&self, hash: &str) -> Result<bool, StoreError> {
        Ok(self.pins.load()?.contains(hash))
    }

    /// All pinned hashes, in sorted order.
    pub fn pinned(&self) -> Result<BTreeSet<String>, StoreError> {
        self.pins.load()
    }

    fn blob_path(&self, hash: &str) -> PathBuf {
        self.store_dir.join(&hash[..2]).join(hash)
    }
}

/// Lower-case hex SHA-256 of `content`.
pub fn hash_content(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Hashes are used as file names, so anything else is treated as absent.
fn is_hash(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, ContentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ContentStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_put_and_get() {
        let (_dir, store) = open_temp();
        let hash = store.put("Hello, CAS!").unwrap();
        assert_eq!(hash.len(), 64);
        assert_eq!(store.get(&hash).unwrap().as_deref(), Some("Hello, CAS!"));
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            hash_content("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_put_is_idempotent() {
        let (_dir, store) = open_temp();
        let first = store.put("same").unwrap();
        let second = store.put("same").unwrap();
        assert_eq!(first, second);
        let stored = fs::read(store.blob_path(&first)).unwrap();
        assert_eq!(stored, b"same");
    }

    #[test]
    fn test_layout_is_sharded() {
        let (dir, store) = open_temp();
        let hash = store.put("layout").unwrap();
        let expected = dir.path().join("store").join(&hash[..2]).join(&hash);
        assert!(expected.is_file());
    }

    #[test]
    fn test_size_boundary() {
        let (_dir, store) = open_temp();
        let at_limit = "a".repeat(MAX_SIZE);
        assert!(store.put(&at_limit).is_ok());

        let over = "a".repeat(MAX_SIZE + 1);
        let err = store.put(&over).unwrap_err();
        assert!(matches!(err, StoreError::TooLarge { size, .. } if size == MAX_SIZE + 1));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_size_counts_utf8_bytes() {
        let (_dir, store) = open_temp();
        // Two bytes per character.
        let over = "é".repeat(MAX_SIZE / 2 + 1);
        assert!(matches!(store.put(&over), Err(StoreError::TooLarge { .. })));
    }

    #[test]
    fn test_put_bytes_rejects_non_text() {
        let (_dir, store) = open_temp();
        let err = store.put_bytes(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
        assert!(err.is_invalid_input());
        assert_eq!(
            store.put_bytes(b"plain").unwrap(),
            store.put("plain").unwrap()
        );
    }

    #[test]
    fn test_get_missing() {
        let (_dir, store) = open_temp();
        assert_eq!(store.get(&"deadbeef".repeat(8)).unwrap(), None);
        assert_eq!(store.get("not-a-hash").unwrap(), None);
        assert!(!store.contains(&"deadbeef".repeat(8)));
    }

    #[test]
    fn test_pin() {
        let (dir, store) = open_temp();
        let hash = store.put("Pin me!").unwrap();
        store.pin(&hash).unwrap();
        store.pin(&hash).unwrap();
        assert!(store.is_pinned(&hash).unwrap());
        assert_eq!(store.pinned().unwrap().len(), 1);
        assert!(dir.path().join("index.json").is_file());
    }

    #[test]
    fn test_pin_without_blob() {
        let (_dir, store) = open_temp();
        let hash = hash_content("not stored yet");
        store.pin(&hash).unwrap();
        assert!(store.is_pinned(&hash).unwrap());
        assert!(!store.contains(&hash));
    }

    #[test]
    fn test_pins_persist_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let hash = {
            let store = ContentStore::open(dir.path()).unwrap();
            let hash = store.put("persist").unwrap();
            store.pin(&hash).unwrap();
            hash
        };
        let reopened = ContentStore::open(dir.path()).unwrap();
        assert!(reopened.is_pinned(&hash).unwrap());
        assert_eq!(reopened.get(&hash).unwrap().as_deref(), Some("persist"));
    }

    #[test]
    fn test_open_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("cas");
        ContentStore::open(&root).unwrap();
        assert!(root.join("store").is_dir());
    }
}
