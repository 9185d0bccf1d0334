//! Repository trait definitions for the domain layer.
//!
//! Traits define the data contracts; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! - [`LinkRepository`] - Short link storage
//! - [`ApiKeyRepository`] - Hashed API key storage

pub mod api_key_repository;
pub mod link_repository;

pub use api_key_repository::ApiKeyRepository;
pub use link_repository::LinkRepository;

#[cfg(test)]
pub use api_key_repository::MockApiKeyRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
