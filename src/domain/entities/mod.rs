//! Core domain entities.
//!
//! - [`Link`] - A short code mapped to a destination URL
//! - [`ApiKey`] - A hashed bearer secret with an optional expiry
//!
//! Creation inputs use separate structs (`NewLink`).

pub mod api_key;
pub mod link;

pub use api_key::{ApiKey, key_validity};
pub use link::{Link, NewLink};
