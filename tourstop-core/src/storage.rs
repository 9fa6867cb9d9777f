//! Device-local key/value storage.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;

use crate::error::{TourError, TourResult};

pub trait Storage {
    fn get(&self, key: &str) -> TourResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> TourResult<()>;

    /// Read-modify-write of one key.
    ///
    /// The default is a plain get followed by a set; implementations that
    /// can be shared between writers serialize it.
    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> TourResult<String>,
    ) -> TourResult<()> {
        let current = self.get(key)?;
        let next = f(current)?;
        self.set(key, &next)
    }
}

/// One `<key>.json` file per key inside a directory.
///
/// `update` holds an exclusive lock on `<key>.lock` for the whole
/// read-modify-write, so concurrent processes cannot lose each other's
/// writes.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> TourResult<PathBuf> {
        Ok(self.dir.join(format!("{}.json", checked_key(key)?)))
    }

    fn lock(&self, key: &str) -> TourResult<File> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.lock", checked_key(key)?));
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;
        file.lock_exclusive()
            .map_err(|e| TourError::Storage(format!("Could not lock {}: {}", path.display(), e)))?;
        Ok(file)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> TourResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> TourResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key)?;

        // Write next to the target and rename, so readers never see a
        // half-written value
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(&path).map_err(|e| TourError::Io(e.error))?;
        Ok(())
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> TourResult<String>,
    ) -> TourResult<()> {
        let lock = self.lock(key)?;
        let current = self.get(key)?;
        let next = f(current)?;
        let result = self.set(key, &next);
        // Unlock failures are harmless: the lock goes away with the handle
        let _ = FileExt::unlock(&lock);
        result
    }
}

/// In-process storage, for tests and sessions without a data directory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> TourResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| TourError::Storage("memory storage poisoned".into()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> TourResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| TourError::Storage("memory storage poisoned".into()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Keys become file names, so only a conservative character set is allowed.
fn checked_key(key: &str) -> TourResult<&str> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if valid {
        Ok(key)
    } else {
        Err(TourError::Storage(format!("invalid storage key '{}'", key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_file_storage_get_set() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("data"));

        assert_eq!(storage.get("ug.tourRequests").unwrap(), None);
        storage.set("ug.tourRequests", "[]").unwrap();
        assert_eq!(storage.get("ug.tourRequests").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("data/ug.tourRequests.json").exists());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(storage.set(key, "x").is_err(), "{:?} should be rejected", key);
        }
    }

    #[test]
    fn test_memory_storage_update() {
        let storage = MemoryStorage::new();
        storage
            .update("counter", &mut |current| {
                assert!(current.is_none());
                Ok("1".to_string())
            })
            .unwrap();
        assert_eq!(storage.get("counter").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_failed_update_leaves_value() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.set("k", "before").unwrap();

        let result = storage.update("k", &mut |_| Err(TourError::Storage("nope".into())));
        assert!(result.is_err());
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("before"));
    }

    #[test]
    fn test_concurrent_file_updates_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FileStorage::new(dir.path()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let storage = Arc::clone(&storage);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        storage
                            .update("counter", &mut |current| {
                                let n: u32 = current.as_deref().unwrap_or("0").parse().unwrap();
                                Ok((n + 1).to_string())
                            })
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(storage.get("counter").unwrap().as_deref(), Some("80"));
    }
}
