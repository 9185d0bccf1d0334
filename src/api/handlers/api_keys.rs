//! Handler for API key issuance.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::api_key::{IssueKeyRequest, IssueKeyResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Issues a new API key.
///
/// # Endpoint
///
/// `POST /links/apikey`
///
/// The first key can be created without credentials. Afterwards the caller
/// must present an existing key as `old_api_key`. The raw secret is returned
/// once and stored only as a hash.
///
/// # Response
///
/// ```json
/// { "api_key": "...", "expires_at": "2025-01-08T12:00:00Z" }
/// ```
pub async fn issue_api_key_handler(
    State(state): State<AppState>,
    payload: Result<Json<IssueKeyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IssueKeyResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let issued = state
        .api_keys
        .issue(payload.old_api_key.as_deref(), payload.api_key)
        .await?;

    Ok((StatusCode::CREATED, Json(issued.into())))
}
