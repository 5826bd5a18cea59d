//! Durable key-value storage backends.
//!
//! The engine only needs keyed text records, so the seam is a small
//! trait with file-backed and in-memory implementations. Writes are
//! best-effort: no flush/durability guarantee beyond "most recent
//! completed mutation, probably".

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::PersistError;

/// Keyed text-record storage.
pub trait StateStorage: Send + Sync {
    /// Read a record. `Ok(None)` when the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`] when the backing medium fails for a
    /// reason other than the record being absent.
    fn read(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Write a record, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`] when the backing medium fails.
    fn write(&self, key: &str, value: &str) -> Result<(), PersistError>;

    /// Delete a record. Absent keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`] when the backing medium fails.
    fn remove(&self, key: &str) -> Result<(), PersistError>;
}

/// File-backed storage: one `<key>.json` file per record under a state
/// directory, created on first write.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a handle rooted at `dir`. The directory itself is created
    /// lazily on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The state directory this handle writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// In-memory storage, used by tests and as a degraded fallback when no
/// writable state directory exists.
#[derive(Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.records().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.records().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistError> {
        self.records().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("cart").unwrap(), None);

        storage.write("cart", r#"{"lines":[]}"#).unwrap();
        assert_eq!(storage.read("cart").unwrap().as_deref(), Some(r#"{"lines":[]}"#));

        storage.remove("cart").unwrap();
        assert_eq!(storage.read("cart").unwrap(), None);
    }

    #[test]
    fn test_memory_storage_remove_absent_is_ok() {
        let storage = MemoryStorage::new();
        storage.remove("never-written").unwrap();
    }

    #[test]
    fn test_file_storage_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.read("cart").unwrap(), None);
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.write("theme", r#"{"mode":"light"}"#).unwrap();
        assert_eq!(
            storage.read("theme").unwrap().as_deref(),
            Some(r#"{"mode":"light"}"#)
        );
        assert!(dir.path().join("theme.json").exists());

        storage.remove("theme").unwrap();
        assert_eq!(storage.read("theme").unwrap(), None);
    }

    #[test]
    fn test_file_storage_creates_directory_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("state").join("v1");
        let storage = FileStorage::new(&nested);

        storage.write("auth", "{}").unwrap();
        assert!(nested.join("auth.json").exists());
    }

    #[test]
    fn test_keys_are_independent_records() {
        let storage = MemoryStorage::new();
        storage.write("cart", "a").unwrap();
        storage.write("favorites", "b").unwrap();
        storage.remove("cart").unwrap();
        assert_eq!(storage.read("favorites").unwrap().as_deref(), Some("b"));
    }
}
