//! Infrastructure layer for external integrations.
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`analytics`] - Redirect analytics delivery

pub mod analytics;
pub mod persistence;
