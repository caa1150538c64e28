// src/store/file.rs

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;

use crate::{error::AppError, store::KeyValueStore};

const EXTENSION: &str = "json";

/// Directory-backed store: one `<key>.json` file per key.
///
/// Writes go to a temporary file that is then renamed over the target, so a
/// reader sees either the old or the new value, never a torn one.
pub struct FileStore {
    dir: PathBuf,
    tmp_seq: AtomicU64,
}

impl FileStore {
    /// Opens (and creates if needed) the store directory.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            tmp_seq: AtomicU64::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, AppError> {
        let safe = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !safe {
            return Err(AppError::BadRequest(format!("Invalid store key: {}", key)));
        }
        Ok(self.dir.join(format!("{}.{}", key, EXTENSION)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put_raw(&self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        let seq = self.tmp_seq.fetch_add(1, Ordering::Relaxed);
        let tmp = self
            .dir
            .join(format!(".{}.{}.{}.tmp", key, std::process::id(), seq));

        fs::write(&tmp, value.as_bytes()).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, AppError> {
        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&self.dir).await?;

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if !key.starts_with(prefix) {
                continue;
            }

            match fs::read_to_string(&path).await {
                Ok(value) => entries.push((key.to_string(), value)),
                Err(e) => tracing::warn!("Skipping unreadable store file {:?}: {}", path, e),
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> FileStore {
        let dir = std::env::temp_dir().join(format!("exam-results-test-{}", uuid::Uuid::new_v4()));
        FileStore::open(dir).await.unwrap()
    }

    #[tokio::test]
    async fn put_then_get_overwrites() {
        let store = temp_store().await;
        store.put_raw("exam_result_1", "first").await.unwrap();
        store.put_raw("exam_result_1", "second").await.unwrap();

        assert_eq!(
            store.get_raw("exam_result_1").await.unwrap().as_deref(),
            Some("second")
        );
        assert!(store.get_raw("exam_result_2").await.unwrap().is_none());

        fs::remove_dir_all(store.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn scan_only_returns_matching_keys() {
        let store = temp_store().await;
        store.put_raw("exam_result_1", "a").await.unwrap();
        store.put_raw("exam_result_2", "b").await.unwrap();
        store.put_raw("other_1", "c").await.unwrap();

        let mut keys: Vec<String> = store
            .scan_prefix("exam_result_")
            .await
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        keys.sort();
        assert_eq!(keys, vec!["exam_result_1", "exam_result_2"]);

        fs::remove_dir_all(store.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn rejects_unsafe_keys() {
        let store = temp_store().await;
        assert!(store.put_raw("../escape", "x").await.is_err());
        assert!(store.get_raw("a/b").await.is_err());

        fs::remove_dir_all(store.dir()).await.unwrap();
    }
}
