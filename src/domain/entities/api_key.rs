//! API key entity. Only the hash of the bearer secret is ever stored.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// How long a freshly issued key stays valid.
pub fn key_validity() -> Duration {
    Duration::weeks(1)
}

/// A stored API key record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub id: Uuid,
    /// Lowercase hex SHA-256 of the raw secret.
    pub key_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ApiKey {
    /// Returns true if the key has an expiry that is not after `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    /// Returns true if the rotation job should replace this key.
    ///
    /// Keys without an expiry are always replaced so that a bounded key is
    /// eventually in place.
    pub fn needs_rotation_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none() || self.is_expired_at(now)
    }
}
