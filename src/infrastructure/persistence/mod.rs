//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! - [`PgLinkRepository`] - Link storage and retrieval
//! - [`PgApiKeyRepository`] - Hashed API key storage

pub mod pg_api_key_repository;
pub mod pg_link_repository;

pub use pg_api_key_repository::PgApiKeyRepository;
pub use pg_link_repository::PgLinkRepository;
