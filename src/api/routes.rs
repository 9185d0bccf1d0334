//! API route configuration.

use crate::api::handlers::{
    create_link_handler, deactivate_link_handler, issue_api_key_handler, list_links_handler,
    redirect_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Link and key management routes.
///
/// Mutating endpoints authenticate with an `api_key` field in the JSON body.
///
/// # Endpoints
///
/// - `GET    /links`          - List active links
/// - `POST   /links`          - Create a short link
/// - `POST   /links/apikey`   - Issue a new API key
/// - `DELETE /links/{code}`   - Deactivate a link
pub fn management_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route("/links/apikey", post(issue_api_key_handler))
        .route("/links/{code}", delete(deactivate_link_handler))
}

/// Public redirect route, `GET /{code}`.
pub fn redirect_routes() -> Router<AppState> {
    Router::new().route("/{code}", get(redirect_handler))
}
