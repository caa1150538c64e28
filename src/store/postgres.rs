// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{error::AppError, store::KeyValueStore};

/// Postgres-backed store over the `result_store` table (see `migrations/`).
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueStore for PgStore {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, AppError> {
        let value: Option<(String,)> =
            sqlx::query_as("SELECT value FROM result_store WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to read result_store: {:?}", e);
                    AppError::InternalServerError(e.to_string())
                })?;

        Ok(value.map(|(v,)| v))
    }

    async fn put_raw(&self, key: &str, value: &str) -> Result<(), AppError> {
        // Upsert: a new value always replaces the old one
        sqlx::query(
            r#"
            INSERT INTO result_store (key, value, updated_at)
            VALUES ($1, $2, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET
                value = EXCLUDED.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert result_store: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, AppError> {
        // starts_with() avoids LIKE escaping of '_' in the prefix
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT key, value FROM result_store WHERE starts_with(key, $1)")
                .bind(prefix)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows)
    }
}
