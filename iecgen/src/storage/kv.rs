//! String key-value stores backing the session repository.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::StorageError;

const STORE_FILE: &str = "storage.json";

/// Minimal durable key-value storage with string values.
pub trait KeyValueStore {
    /// Read a key. Absent keys are `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a key with a new value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// All keys kept as one JSON object in a single file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open the store file inside `dir`, creating the directory if needed.
    pub fn in_dir(dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
        Ok(Self::open_at(dir.join(STORE_FILE)))
    }

    /// Use a specific file path. The file is created on first write.
    pub const fn open_at(path: PathBuf) -> Self {
        Self { path }
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|_| StorageError::Corrupt(self.path.clone()))
    }

    /// Write via a sibling temp file and rename so readers never see a partial file.
    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");

        std::fs::write(&tmp_path, content).map_err(|e| StorageError::io(&tmp_path, e))?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| StorageError::io(&self.path, e))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(StorageError::Corrupt(path)) => {
                tracing::warn!(path = %path.display(), "replacing corrupt store file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };

        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }
}

/// In-memory store for tests and ephemeral sessions.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with raw values.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Unavailable)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Unavailable)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::in_dir(&dir.path().join("nested")).unwrap();

        assert_eq!(store.get("iec-theme").unwrap(), None);
        store.set("iec-theme", "dark").unwrap();
        store.set("other", "value").unwrap();

        let reopened = FileStore::open_at(store.path().to_path_buf());
        assert_eq!(reopened.get("iec-theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("value"));
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_store_overwrites_whole_value() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::in_dir(dir.path()).unwrap();
        store.set("k", "first").unwrap();
        store.set("k", "second").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::in_dir(dir.path()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.get("k"), Err(StorageError::Corrupt(_))));

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::with_entries([("a", "1")]);
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.get("b").unwrap(), None);
    }
}
