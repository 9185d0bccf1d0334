//! Handlers for link management endpoints (create, list, deactivate).

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::{
    CreateLinkRequest, DeactivateLinkRequest, DeactivateResponse, LinkResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /links`
///
/// # Request Body
///
/// ```json
/// {
///   "api_key": "...",
///   "original_url": "example.com",
///   "short_url": "promo"
/// }
/// ```
///
/// `short_url` is optional; a random code is generated when it is absent or
/// blank. `original_url` gets `https://` prepended when it has no scheme.
///
/// # Errors
///
/// - 400 malformed JSON, invalid body or code format
/// - 401 invalid or expired API key
/// - 409 requested code already taken
/// - 500 code generation exhausted or storage failure
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state
        .shortener
        .create_link(
            &payload.api_key,
            &payload.original_url,
            payload.desired_code(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Lists every active link.
///
/// # Endpoint
///
/// `GET /links`
///
/// No pagination and no ordering guarantee.
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.shortener.list_active().await?;

    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}

/// Deactivates a link by code.
///
/// # Endpoint
///
/// `DELETE /links/{code}` with body `{"api_key": "..."}`
///
/// # Errors
///
/// - 400 link already inactive
/// - 401 invalid or expired API key
/// - 404 no link with this code
pub async fn deactivate_link_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    payload: Result<Json<DeactivateLinkRequest>, JsonRejection>,
) -> Result<Json<DeactivateResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    state.shortener.deactivate(&payload.api_key, &code).await?;

    Ok(Json(DeactivateResponse::deactivated()))
}
