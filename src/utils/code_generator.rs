//! Short code generation and validation utilities.
//!
//! Generated codes are random alphanumeric strings; uniqueness is not checked
//! here but enforced by the storage constraint and the caller's retry loop.

use crate::error::AppError;
use rand::{Rng, distr::Alphanumeric};
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Length of generated codes unless configured otherwise.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Shortest accepted custom code.
pub const MIN_CODE_LENGTH: usize = 3;

/// Longest accepted custom code (matches the `short_url` column width).
pub const MAX_CODE_LENGTH: usize = 20;

/// Allowed characters for custom codes.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static regex is valid"));

/// Codes that collide with fixed routes and would never be redirected.
const RESERVED_CODES: &[&str] = &["links", "health", "apikey"];

/// Generates a random code of `length` characters from `[A-Za-z0-9]`.
///
/// Each character is drawn uniformly from the 62-symbol alphabet using the
/// thread-local OS-seeded RNG. Reserved route names are redrawn.
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();

    loop {
        let code: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect();

        if !is_reserved(&code) {
            return code;
        }
    }
}

/// Whether `code` collides with a fixed route.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Allowed characters: letters, digits, `_` and `-`
/// - Length: 3-20 characters
/// - Cannot be a reserved route name
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if !CUSTOM_CODE_REGEX.is_match(code) {
        tracing::warn!(short_url = code, "Invalid short URL format");
        return Err(AppError::bad_request(
            "Short URL not valid, only alphanumeric characters, hyphens, and underscores are allowed.",
            json!({ "short_url": code }),
        ));
    }

    if code.len() < MIN_CODE_LENGTH || code.len() > MAX_CODE_LENGTH {
        tracing::warn!(short_url = code, "Short URL length invalid");
        return Err(AppError::bad_request(
            "Short URL must be between 3 and 20 characters long.",
            json!({ "short_url": code, "provided_length": code.len() }),
        ));
    }

    if is_reserved(code) {
        return Err(AppError::bad_request(
            "This short URL is reserved.",
            json!({ "short_url": code }),
        ));
    }

    Ok(())
}
