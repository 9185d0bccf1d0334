//! Best-effort delivery of redirect analytics.
//!
//! Provides an [`AnalyticsPublisher`] trait with two implementations:
//! - [`HttpAnalytics`] - Posts events to the configured metrics service
//! - [`NullAnalytics`] - No-op implementation when no endpoint is configured

mod http_analytics;
mod null_analytics;
mod service;

pub use http_analytics::HttpAnalytics;
pub use null_analytics::NullAnalytics;
pub use service::{AnalyticsError, AnalyticsPublisher};
