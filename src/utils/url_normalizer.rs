//! Destination URL canonicalization.
//!
//! The only rewrite applied is scheme completion: submissions without an
//! `http://` or `https://` prefix get `https://` prepended. Nothing else about
//! the URL is rewritten. [`ensure_redirectable`] separately rejects
//! destinations that could never be sent back in a `Location` header.

use axum::http::HeaderValue;
use serde_json::json;

use crate::error::AppError;

/// Scheme prepended to destinations that lack one.
const DEFAULT_SCHEME: &str = "https://";

/// Schemes accepted as already present (compared case-insensitively).
const KNOWN_SCHEMES: &[&str] = &["http://", "https://"];

/// Ensures the destination URL carries an HTTP(S) scheme.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("example.com"), "https://example.com");
/// assert_eq!(normalize_url("http://example.com"), "http://example.com");
/// assert_eq!(normalize_url("HTTPS://Example.com/A"), "HTTPS://Example.com/A");
/// ```
pub fn normalize_url(input: &str) -> String {
    if has_known_scheme(input) {
        input.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{input}")
    }
}

/// Checks that `url` is usable as a `Location` header value.
///
/// Control characters (other than tab) and DEL are rejected. Storing such a
/// destination would make every redirect for the link fail.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the value cannot be a header.
pub fn ensure_redirectable(url: &str) -> Result<(), AppError> {
    if HeaderValue::from_str(url).is_err() {
        tracing::warn!("Destination URL contains characters not allowed in a header");
        return Err(AppError::bad_request(
            "URL contains characters that cannot be used in a redirect.",
            json!({ "original_url": url }),
        ));
    }

    Ok(())
}

fn has_known_scheme(input: &str) -> bool {
    KNOWN_SCHEMES.iter().any(|scheme| {
        input
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
