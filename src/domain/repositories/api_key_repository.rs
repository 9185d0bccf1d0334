//! Repository trait for API key storage.

use crate::domain::entities::ApiKey;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for hashed API keys.
///
/// Rows are append-only: a key is superseded by inserting a newer one, never
/// updated in place.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgApiKeyRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    /// Stores a new key hash.
    async fn insert(
        &self,
        key_hash: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ApiKey, AppError>;

    /// Finds the most recent key with the given hash.
    async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, AppError>;

    /// Returns the most recently created key.
    async fn latest(&self) -> Result<Option<ApiKey>, AppError>;

    /// Returns true if any key has ever been stored.
    async fn exists_any(&self) -> Result<bool, AppError>;

    /// Lists all keys, newest first.
    async fn list(&self) -> Result<Vec<ApiKey>, AppError>;
}
