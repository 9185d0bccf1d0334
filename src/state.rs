//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{ApiKeyService, ShortenerService};
use crate::domain::repositories::{ApiKeyRepository, LinkRepository};
use crate::infrastructure::analytics::AnalyticsPublisher;

/// Shortener service over type-erased repositories.
pub type DynShortenerService = ShortenerService<dyn LinkRepository, dyn ApiKeyRepository>;

/// API key service over a type-erased repository.
pub type DynApiKeyService = ApiKeyService<dyn ApiKeyRepository>;

#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<DynShortenerService>,
    pub api_keys: Arc<DynApiKeyService>,
}

impl AppState {
    /// Wires the services over the given repositories.
    ///
    /// The shortener and the `/links/apikey` endpoint share one
    /// [`ApiKeyService`] instance.
    pub fn new(
        links: Arc<dyn LinkRepository>,
        keys: Arc<dyn ApiKeyRepository>,
        analytics: Arc<dyn AnalyticsPublisher>,
        code_length: usize,
    ) -> Self {
        let api_keys = Arc::new(ApiKeyService::new(keys));
        let shortener = Arc::new(ShortenerService::new(
            links,
            Arc::clone(&api_keys),
            analytics,
            code_length,
        ));

        Self {
            shortener,
            api_keys,
        }
    }
}
