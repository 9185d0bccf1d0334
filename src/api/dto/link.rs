//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::Link;

/// Body of `POST /links`.
///
/// Missing string fields deserialize as empty and are rejected by validation,
/// so every malformed body yields the same 400 envelope.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "API key is required"))]
    pub api_key: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 2048, message = "URL must be between 1 and 2048 characters"))]
    pub original_url: String,

    /// Desired code. Blank is treated as absent.
    pub short_url: Option<String>,
}

impl CreateLinkRequest {
    /// The desired code, if a non-blank one was sent.
    pub fn desired_code(&self) -> Option<String> {
        self.short_url
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
    }
}

/// Body of `DELETE /links/{code}`.
#[derive(Debug, Deserialize, Validate)]
pub struct DeactivateLinkRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "API key is required"))]
    pub api_key: String,
}

/// JSON representation of a link.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkResponse {
    pub id: Uuid,
    pub original_url: String,
    pub short_url: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            original_url: link.original_url,
            short_url: link.short_url,
            is_active: link.is_active,
            created_at: link.created_at,
            deleted_at: link.deleted_at,
        }
    }
}

/// Acknowledgement returned after deactivation.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeactivateResponse {
    pub detail: String,
}

impl DeactivateResponse {
    pub fn deactivated() -> Self {
        Self {
            detail: "Short URL deactivated successfully.".to_string(),
        }
    }
}
