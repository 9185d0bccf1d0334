//! HTTP analytics publisher.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::service::{AnalyticsError, AnalyticsPublisher};
use crate::domain::redirect_event::RedirectEvent;

/// Posts redirect events as JSON to an external metrics service.
///
/// Every request is bounded by the configured timeout; a non-2xx response is
/// treated as a failed delivery.
pub struct HttpAnalytics {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalytics {
    /// Creates a publisher for `endpoint` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Transport`] if the HTTP client cannot be built.
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, AnalyticsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalyticsPublisher for HttpAnalytics {
    async fn publish(&self, event: &RedirectEvent) -> Result<(), AnalyticsError> {
        let response = self.client.post(&self.endpoint).json(event).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyticsError::Status(status));
        }

        debug!(
            short_url = %event.short_url,
            link_id = %event.link_id,
            "Analytics event delivered"
        );

        Ok(())
    }
}
