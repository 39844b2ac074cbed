//! File-backed implementation of [`KeyValueStorage`].
//!
//! Every key lives in one JSON object file:
//!
//! ```json
//! { "@GoMarketplace:products": "[{\"id\":\"a\",...}]" }
//! ```
//!
//! A missing file reads as an empty table. Writes go to `<path>.tmp` and are
//! renamed over the target, so readers never see a partial file.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::KeyValueStorage;
use crate::error::StorageError;

type Table = BTreeMap<String, String>;

/// JSON-file storage backend.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStorage {
    /// Use `path` as the backing file. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_table(&self) -> Result<Table, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Table::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Table::new());
        }

        serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    async fn write_table(&self, table: &Table) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string_pretty(table)?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, contents).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(path = %self.path.display(), keys = table.len(), "Storage file written");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        let mut table = self.read_table().await?;
        Ok(table.remove(key))
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut table = self.read_table().await?;
        table.insert(key.to_owned(), value.to_owned());
        self.write_table(&table).await
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut table = self.read_table().await?;
        if table.remove(key).is_some() {
            self.write_table(&table).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("absent.json"));

        assert_eq!(storage.get_item("k").await.unwrap(), None);
        storage.remove_item("k").await.unwrap();
        assert!(!storage.path().exists());
    }

    #[tokio::test]
    async fn test_values_survive_a_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        FileStorage::new(&path).set_item("a", "1").await.unwrap();
        FileStorage::new(&path).set_item("b", "2").await.unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get_item("b").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_remove_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("store.json"));
        storage.set_item("a", "1").await.unwrap();
        storage.set_item("b", "2").await.unwrap();

        storage.remove_item("a").await.unwrap();

        assert_eq!(storage.get_item("a").await.unwrap(), None);
        assert_eq!(storage.get_item("b").await.unwrap().as_deref(), Some("2"));
        assert!(!storage.tmp_path().exists());
    }

    #[tokio::test]
    async fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        // A non-empty directory at the target path makes the rename fail.
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), "").unwrap();

        let storage = FileStorage::new(&path);
        let err = storage.write_table(&Table::new()).await.unwrap_err();

        assert!(matches!(err, StorageError::Io(_)));
        assert!(!storage.tmp_path().exists());
        assert!(path.is_dir());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileStorage::new(&path).get_item("a").await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }
}
