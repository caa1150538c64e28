// src/store/mod.rs

pub mod file;
pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{config::RESULT_KEY_PREFIX, error::AppError, models::exam_record::PersistedResultRecord};

pub use file::FileStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Raw string key-value storage. Backends only move strings around;
/// (de)serialization and corruption handling live in [`ResultStore`].
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Unconditional overwrite.
    async fn put_raw(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// All `(key, value)` pairs whose key starts with `prefix`, in no particular order.
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, AppError>;
}

pub fn result_key(exam_id: &str) -> String {
    format!("{}{}", RESULT_KEY_PREFIX, exam_id)
}

/// One persisted result per exam id, last write wins.
#[derive(Clone)]
pub struct ResultStore {
    backend: Arc<dyn KeyValueStore>,
}

impl ResultStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Replaces whatever is stored for `exam_id`.
    pub async fn put(&self, exam_id: &str, record: &PersistedResultRecord) -> Result<(), AppError> {
        let value = serde_json::to_string(record)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        self.backend.put_raw(&result_key(exam_id), &value).await?;
        tracing::info!("Stored result for exam {}", exam_id);
        Ok(())
    }

    /// Reads the record for `exam_id`.
    /// Unreadable or unparsable entries are reported as absent.
    pub async fn get(&self, exam_id: &str) -> Option<PersistedResultRecord> {
        let key = result_key(exam_id);
        let raw = match self.backend.get_raw(&key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Failed to read stored result {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Ignoring unparsable stored result {}: {}", key, e);
                None
            }
        }
    }

    /// Every stored record, newest first. Unparsable entries are skipped.
    pub async fn list(&self) -> Vec<PersistedResultRecord> {
        let entries = match self.backend.scan_prefix(RESULT_KEY_PREFIX).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Failed to scan stored results: {}", e);
                return Vec::new();
            }
        };

        let mut records: Vec<PersistedResultRecord> = entries
            .into_iter()
            .filter_map(|(key, raw)| match serde_json::from_str(&raw) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping unparsable stored result {}: {}", key, e);
                    None
                }
            })
            .collect();

        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exam_record::{ResultStatus, ResultSummary};
    use chrono::{Duration, Utc};

    fn record(exam_id: &str, correct: u32, minutes_ago: i64) -> PersistedResultRecord {
        PersistedResultRecord {
            exam_id: exam_id.to_string(),
            result: ResultSummary {
                total_questions: 10,
                correct_answers: correct,
                incorrect_answers: 10 - correct,
                percentage: f64::from(correct) * 10.0,
                result_status: if correct >= 6 { ResultStatus::Pass } else { ResultStatus::Fail },
            },
            answers: vec![Some(0), None, Some(2)],
            exam_title: Some(format!("Exam {}", exam_id)),
            time_spent: 300.0,
            timestamp: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn last_write_wins() {
        let store = ResultStore::in_memory();
        let a = record("42", 3, 10);
        let b = record("42", 8, 0);

        store.put("42", &a).await.unwrap();
        store.put("42", &b).await.unwrap();

        assert_eq!(store.get("42").await, Some(b));
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn exams_do_not_collide() {
        let store = ResultStore::in_memory();
        store.put("1", &record("1", 5, 0)).await.unwrap();
        store.put("2", &record("2", 9, 0)).await.unwrap();

        assert_eq!(store.get("1").await.unwrap().result.correct_answers, 5);
        assert_eq!(store.get("2").await.unwrap().result.correct_answers, 9);
        assert!(store.get("3").await.is_none());
    }

    #[tokio::test]
    async fn corrupted_entry_reads_as_absent() {
        let backend = Arc::new(MemoryStore::new());
        let store = ResultStore::new(backend.clone());

        backend.put_raw(&result_key("42"), "{not json").await.unwrap();
        assert!(store.get("42").await.is_none());

        // Valid JSON in an old shape is treated the same way.
        backend
            .put_raw(&result_key("42"), r#"{"examId":"42","score":70}"#)
            .await
            .unwrap();
        assert!(store.get("42").await.is_none());
    }

    #[tokio::test]
    async fn list_is_newest_first_and_skips_garbage() {
        let backend = Arc::new(MemoryStore::new());
        let store = ResultStore::new(backend.clone());

        store.put("old", &record("old", 4, 60)).await.unwrap();
        store.put("new", &record("new", 9, 1)).await.unwrap();
        store.put("mid", &record("mid", 7, 30)).await.unwrap();
        backend.put_raw(&result_key("broken"), "???").await.unwrap();
        backend.put_raw("unrelated_key", "{}").await.unwrap();

        let ids: Vec<String> = store.list().await.into_iter().map(|r| r.exam_id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }
}
