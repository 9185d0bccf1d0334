//! Application layer services implementing business logic.
//!
//! Services consume repository traits and expose the operations HTTP handlers,
//! the admin CLI and the background rotation job call into.
//!
//! - [`services::ShortenerService`] - Link creation, deactivation and redirects
//! - [`services::ApiKeyService`] - API key hashing, validation and rotation
//! - [`key_rotation::run_key_rotation`] - Periodic key rotation loop

pub mod key_rotation;
pub mod services;
