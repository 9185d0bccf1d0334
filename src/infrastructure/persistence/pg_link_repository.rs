//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::timestamps::{naive_as_utc, to_naive_utc};

/// Raw `short_links` row.
#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    id: Uuid,
    original_url: String,
    short_url: String,
    is_active: bool,
    created_at: NaiveDateTime,
    deleted_at: Option<NaiveDateTime>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link {
            id: row.id,
            original_url: row.original_url,
            short_url: row.short_url,
            is_active: row.is_active,
            created_at: naive_as_utc(row.created_at),
            deleted_at: row.deleted_at.map(naive_as_utc),
        }
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Code uniqueness is enforced by the `short_links_short_url_key` constraint;
/// inserts never pre-check existence.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO short_links (id, original_url, short_url, is_active, created_at)
            VALUES ($1, $2, $3, TRUE, $4)
            RETURNING id, original_url, short_url, is_active, created_at, deleted_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_link.original_url)
        .bind(&new_link.short_url)
        .bind(to_naive_utc(Utc::now()))
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, short_url, is_active, created_at, deleted_at
            FROM short_links
            WHERE short_url = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_active_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, short_url, is_active, created_at, deleted_at
            FROM short_links
            WHERE short_url = $1 AND is_active = TRUE
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn list_active(&self) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, short_url, is_active, created_at, deleted_at
            FROM short_links
            WHERE is_active = TRUE
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn deactivate(&self, link: &Link) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            UPDATE short_links
            SET is_active = FALSE, deleted_at = $2
            WHERE id = $1
            RETURNING id, original_url, short_url, is_active, created_at, deleted_at
            "#,
        )
        .bind(link.id)
        .bind(to_naive_utc(Utc::now()))
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Link::from).ok_or_else(|| {
            AppError::not_found(
                "Short URL not found.",
                json!({ "short_url": link.short_url }),
            )
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
