//! PostgreSQL implementation of API key repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::ApiKey;
use crate::domain::repositories::ApiKeyRepository;
use crate::error::AppError;
use crate::utils::timestamps::{naive_as_utc, to_naive_utc};

/// Raw `api_keys` row. Timestamps are zone-less and hold UTC wall-clock time.
#[derive(Debug, sqlx::FromRow)]
struct ApiKeyRow {
    id: Uuid,
    key_hash: String,
    created_at: NaiveDateTime,
    expires_at: Option<NaiveDateTime>,
}

impl From<ApiKeyRow> for ApiKey {
    fn from(row: ApiKeyRow) -> Self {
        ApiKey {
            id: row.id,
            key_hash: row.key_hash,
            created_at: naive_as_utc(row.created_at),
            expires_at: row.expires_at.map(naive_as_utc),
        }
    }
}

/// PostgreSQL repository for hashed API keys. Raw secrets are never persisted.
pub struct PgApiKeyRepository {
    pool: Arc<PgPool>,
}

impl PgApiKeyRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyRepository for PgApiKeyRepository {
    async fn insert(
        &self,
        key_hash: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ApiKey, AppError> {
        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            INSERT INTO api_keys (id, key_hash, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, key_hash, created_at, expires_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(key_hash)
        .bind(to_naive_utc(Utc::now()))
        .bind(expires_at.map(to_naive_utc))
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, AppError> {
        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT id, key_hash, created_at, expires_at
            FROM api_keys
            WHERE key_hash = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(key_hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ApiKey::from))
    }

    async fn latest(&self) -> Result<Option<ApiKey>, AppError> {
        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT id, key_hash, created_at, expires_at
            FROM api_keys
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ApiKey::from))
    }

    async fn exists_any(&self) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM api_keys)")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(exists)
    }

    async fn list(&self) -> Result<Vec<ApiKey>, AppError> {
        let rows = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT id, key_hash, created_at, expires_at
            FROM api_keys
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ApiKey::from).collect())
    }
}
