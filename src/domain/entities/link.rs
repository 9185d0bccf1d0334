//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A short code mapped to a destination URL.
///
/// Links are never removed. Deactivation flips `is_active` and stamps
/// `deleted_at`, and the code stays reserved forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: Uuid,
    pub original_url: String,
    pub short_url: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Creates an active link.
    pub fn new(
        id: Uuid,
        original_url: String,
        short_url: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_url,
            is_active: true,
            created_at,
            deleted_at: None,
        }
    }

    /// Returns the link in its deactivated state.
    pub fn deactivated_at(mut self, at: DateTime<Utc>) -> Self {
        self.is_active = false;
        self.deleted_at = Some(at);
        self
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub original_url: String,
    pub short_url: String,
}
