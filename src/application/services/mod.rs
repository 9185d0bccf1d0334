//! Business logic services for the application layer.

pub mod api_key_service;
pub mod shortener_service;

pub use api_key_service::{ApiKeyService, IssuedKey};
pub use shortener_service::ShortenerService;
