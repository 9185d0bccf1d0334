//! No-op analytics publisher.

use super::service::{AnalyticsError, AnalyticsPublisher};
use crate::domain::redirect_event::RedirectEvent;
use async_trait::async_trait;
use tracing::debug;

/// Publisher used when `METRICS_SERVICE_URL` is not configured.
pub struct NullAnalytics;

impl NullAnalytics {
    pub fn new() -> Self {
        debug!("Using NullAnalytics (analytics delivery disabled)");
        Self
    }
}

impl Default for NullAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalyticsPublisher for NullAnalytics {
    async fn publish(&self, _event: &RedirectEvent) -> Result<(), AnalyticsError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
