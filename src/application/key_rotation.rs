//! Background API key rotation.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::application::services::ApiKeyService;
use crate::domain::repositories::ApiKeyRepository;

/// Runs the rotation check every `interval` for the life of the process.
///
/// The first check happens after one full interval. Storage failures are
/// logged and the loop carries on with the next tick.
pub async fn run_key_rotation<R>(service: Arc<ApiKeyService<R>>, interval: Duration)
where
    R: ApiKeyRepository + ?Sized,
{
    info!(interval_secs = interval.as_secs(), "API key rotation task started");

    loop {
        tokio::time::sleep(interval).await;

        match service.rotate_if_needed().await {
            Ok(Some(issued)) => {
                info!(
                    key_id = %issued.key.id,
                    expires_at = ?issued.key.expires_at,
                    "API key rotated"
                );
            }
            Ok(None) => {
                info!("Current API key still valid, rotation skipped");
            }
            Err(e) => {
                metrics::counter!("shortener_key_rotation_failures_total").increment(1);
                error!(error = %e, "API key rotation failed");
            }
        }
    }
}
