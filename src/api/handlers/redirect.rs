//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, HeaderName, header},
    response::Redirect,
};
use std::net::SocketAddr;

use crate::domain::redirect_event::VisitorInfo;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Answers `307 Temporary Redirect`. Unknown and deactivated codes both yield
/// `404`. Visitor details are forwarded to analytics in the background and
/// never delay the response.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Redirect, AppError> {
    let visitor = VisitorInfo {
        ip: Some(addr.ip().to_string()),
        user_agent: header_value(&headers, header::USER_AGENT),
        referer: header_value(&headers, header::REFERER),
        accept_language: header_value(&headers, header::ACCEPT_LANGUAGE),
    };

    let target = state.shortener.redirect(&code, visitor).await?;

    Ok(Redirect::temporary(&target))
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
