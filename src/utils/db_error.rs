//! Classification helpers for database driver errors.

use crate::error::AppError;

/// Name of the unique constraint on `short_links.short_url`.
pub const SHORT_URL_CONSTRAINT: &str = "short_links_short_url_key";

/// Returns `true` when `e` is a unique violation on the short code column.
///
/// Unique violations on any other constraint are not treated as code
/// collisions and surface as storage errors.
pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(SHORT_URL_CONSTRAINT))
}

/// Returns `true` when the error signals a short code collision.
pub fn is_code_collision(e: &AppError) -> bool {
    matches!(e, AppError::DuplicateCode)
}
