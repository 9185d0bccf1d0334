//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new active link.
    ///
    /// Existence of the code is not checked beforehand; a collision is
    /// reported by the storage constraint.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if `short_url` is already taken by
    /// any link, active or not.
    ///
    /// Returns [`AppError::Storage`] on other database errors.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by code regardless of its state.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Finds an active link by code.
    async fn find_active_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Lists all active links in no particular order.
    async fn list_active(&self) -> Result<Vec<Link>, AppError>;

    /// Marks the link inactive and stamps `deleted_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the row disappeared.
    /// Returns [`AppError::Storage`] on database errors.
    async fn deactivate(&self, link: &Link) -> Result<Link, AppError>;

    /// Checks that storage is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
