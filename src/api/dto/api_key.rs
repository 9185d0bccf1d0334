//! DTOs for API key issuance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::IssuedKey;

/// Body of `POST /links/apikey`.
///
/// Both fields are optional. `old_api_key` is required once any key exists.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct IssueKeyRequest {
    pub old_api_key: Option<String>,

    #[validate(length(min = 16, message = "API key must be at least 16 characters long"))]
    pub api_key: Option<String>,
}

/// The raw secret, shown once.
#[derive(Debug, Serialize, Deserialize)]
pub struct IssueKeyResponse {
    pub api_key: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<IssuedKey> for IssueKeyResponse {
    fn from(issued: IssuedKey) -> Self {
        Self {
            api_key: issued.secret,
            expires_at: issued.key.expires_at,
        }
    }
}
