//! Analytics publisher trait and error types.

use async_trait::async_trait;

use crate::domain::redirect_event::RedirectEvent;

/// Errors that can occur while delivering an analytics event.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("Analytics request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Analytics endpoint responded with status {0}")]
    Status(reqwest::StatusCode),
}

/// Sink for redirect events.
///
/// Delivery is best-effort: callers log failures and move on, and nothing is
/// retried.
///
/// # Implementations
///
/// - [`crate::infrastructure::analytics::HttpAnalytics`] - JSON POST to a configured endpoint
/// - [`crate::infrastructure::analytics::NullAnalytics`] - No-op when no endpoint is configured
#[async_trait]
pub trait AnalyticsPublisher: Send + Sync {
    /// Delivers one event.
    async fn publish(&self, event: &RedirectEvent) -> Result<(), AnalyticsError>;

    /// Returns false when publishing is a no-op, letting callers skip the work.
    fn is_enabled(&self) -> bool {
        true
    }
}
