//! Content-addressed JSON cache on local disk.
//!
//! Each key maps to `<dir>/<sha256(key) hex>.json`. Entries never expire.

use crate::common::text::pretty_json;
use crate::error::Result;
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// The directory is created on first save.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", hex_digest(key)))
    }

    /// `None` when nothing was saved under `key`.
    pub fn load(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        debug!("Cache hit {}", path.display());
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn save(&self, key: &str, value: &Value) -> Result<()> {
        self.save_as(key, value)
    }

    pub fn load_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.load(key)?
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    pub fn save_as<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), pretty_json(value)?)?;
        Ok(())
    }
}

fn hex_digest(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_path_is_sha256_of_key() {
        let store = CacheStore::new("cache");
        assert_eq!(
            store.path_for("abc"),
            PathBuf::from("cache/ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad.json")
        );
        assert_eq!(store.path_for("k"), store.path_for("k"));
        assert_ne!(store.path_for("k"), store.path_for("K"));
    }

    #[test]
    fn test_missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path().join("nested"));
        assert_eq!(store.load("nothing").unwrap(), None);
    }

    #[test]
    fn test_save_is_pretty_printed() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path().join("c"));
        store.save("q", &json!({"a": [1, 2]})).unwrap();
        let raw = fs::read_to_string(store.path_for("q")).unwrap();
        assert!(raw.starts_with("{\n  \"a\""));
    }

    #[test]
    fn test_typed_helpers() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        store.save_as("v", &vec!["x".to_string(), "y".to_string()]).unwrap();
        let back: Option<Vec<String>> = store.load_as("v").unwrap();
        assert_eq!(back, Some(vec!["x".to_string(), "y".to_string()]));
    }

    #[test]
    fn test_corrupt_entry_is_error() {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path());
        fs::write(store.path_for("bad"), "{not json").unwrap();
        assert!(store.load("bad").is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]
        #[test]
        fn prop_save_then_load(key in ".{0,40}", text in ".{0,80}", n in any::<i64>()) {
            let dir = TempDir::new().unwrap();
            let store = CacheStore::new(dir.path());
            let value = json!({"text": text, "n": n});
            store.save(&key, &value).unwrap();
            prop_assert_eq!(store.load(&key).unwrap(), Some(value));
        }
    }
}
