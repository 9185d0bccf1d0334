//! Redirect event model for analytics delivery.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Request metadata captured from a redirect.
///
/// All fields are optional so that missing headers never block a redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitorInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub accept_language: Option<String>,
}

/// Payload posted to the analytics endpoint after a successful redirect.
///
/// Serializes as:
///
/// ```json
/// {
///   "link_id": "6f0b...",
///   "short_url": "promo",
///   "ip": "203.0.113.7",
///   "user_agent": "Mozilla/5.0",
///   "referer": null,
///   "accept_language": "en-US",
///   "timestamp": "2025-01-01T12:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RedirectEvent {
    pub link_id: Uuid,
    pub short_url: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub accept_language: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl RedirectEvent {
    /// Creates an event stamped with the current time.
    pub fn new(link_id: Uuid, short_url: String, visitor: VisitorInfo) -> Self {
        Self {
            link_id,
            short_url,
            ip: visitor.ip,
            user_agent: visitor.user_agent,
            referer: visitor.referer,
            accept_language: visitor.accept_language,
            timestamp: Utc::now(),
        }
    }
}
