//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod api_keys;
pub mod health;
pub mod links;
pub mod redirect;

pub use api_keys::issue_api_key_handler;
pub use health::health_handler;
pub use links::{create_link_handler, deactivate_link_handler, list_links_handler};
pub use redirect::redirect_handler;
