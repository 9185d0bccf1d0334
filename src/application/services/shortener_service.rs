//! Link creation, deactivation and redirect resolution.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::application::services::ApiKeyService;
use crate::domain::entities::{Link, NewLink};
use crate::domain::redirect_event::{RedirectEvent, VisitorInfo};
use crate::domain::repositories::{ApiKeyRepository, LinkRepository};
use crate::error::AppError;
use crate::infrastructure::analytics::AnalyticsPublisher;
use crate::utils::code_generator::{generate_code, validate_custom_code};
use crate::utils::db_error::is_code_collision;
use crate::utils::url_normalizer::{ensure_redirectable, normalize_url};

/// Total insert attempts for generated codes before giving up.
pub const MAX_ATTEMPTS: usize = 5;

/// Orchestrates the shortener's mutating and resolving operations.
///
/// Every mutating call authenticates through [`ApiKeyService`] first and
/// propagates its failure unchanged. Uniqueness of codes is left entirely to
/// the storage constraint.
pub struct ShortenerService<L, K>
where
    L: LinkRepository + ?Sized,
    K: ApiKeyRepository + ?Sized,
{
    links: Arc<L>,
    api_keys: Arc<ApiKeyService<K>>,
    analytics: Arc<dyn AnalyticsPublisher>,
    code_length: usize,
}

impl<L, K> ShortenerService<L, K>
where
    L: LinkRepository + ?Sized,
    K: ApiKeyRepository + ?Sized,
{
    pub fn new(
        links: Arc<L>,
        api_keys: Arc<ApiKeyService<K>>,
        analytics: Arc<dyn AnalyticsPublisher>,
        code_length: usize,
    ) -> Self {
        Self {
            links,
            api_keys,
            analytics,
            code_length,
        }
    }

    /// Creates a new short link.
    ///
    /// # Code selection
    ///
    /// - With `desired_code`, the code is validated and inserted once. A taken
    ///   code is reported as a conflict.
    /// - Without it, random codes are inserted until one is accepted, up to
    ///   [`MAX_ATTEMPTS`] in total.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthorized`] if the key is unknown or expired
    /// - [`AppError::Validation`] if the desired code is malformed or reserved,
    ///   or the URL cannot be sent as a `Location` header
    /// - [`AppError::Conflict`] if the desired code is taken
    /// - [`AppError::GenerationExhausted`] if every generated code collided
    /// - [`AppError::Storage`] on any other database error
    pub async fn create_link(
        &self,
        api_key: &str,
        original_url: &str,
        desired_code: Option<String>,
    ) -> Result<Link, AppError> {
        self.api_keys.validate(api_key).await?;

        let original_url = normalize_url(original_url);
        ensure_redirectable(&original_url)?;

        let link = match desired_code {
            Some(code) => self.insert_desired(original_url, code).await?,
            None => self.insert_generated(original_url).await?,
        };

        metrics::counter!("shortener_links_created_total").increment(1);
        info!(short_url = %link.short_url, link_id = %link.id, "Short link created");

        Ok(link)
    }

    /// Deactivates an active link.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthorized`] if the key is unknown or expired
    /// - [`AppError::NotFound`] if no link has this code
    /// - [`AppError::Validation`] if the link is already inactive
    pub async fn deactivate(&self, api_key: &str, code: &str) -> Result<Link, AppError> {
        self.api_keys.validate(api_key).await?;

        let link = self.links.find_by_code(code).await?.ok_or_else(|| {
            AppError::not_found("Short URL not found.", json!({ "short_url": code }))
        })?;

        if !link.is_active {
            return Err(AppError::bad_request(
                "Short URL is already deactivated.",
                json!({ "short_url": code }),
            ));
        }

        let link = self.links.deactivate(&link).await?;

        metrics::counter!("shortener_links_deactivated_total").increment(1);
        info!(short_url = %link.short_url, link_id = %link.id, "Short link deactivated");

        Ok(link)
    }

    /// Resolves an active code to its destination.
    ///
    /// Unknown and deactivated codes yield the same error. On success an
    /// analytics event is published on a detached task; its outcome never
    /// reaches the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if there is no active link for `code`.
    pub async fn redirect(&self, code: &str, visitor: VisitorInfo) -> Result<String, AppError> {
        let Some(link) = self.links.find_active_by_code(code).await? else {
            metrics::counter!("shortener_redirects_total", "outcome" => "not_found").increment(1);
            return Err(AppError::not_found(
                "Short URL not found or has been deleted.",
                json!({ "short_url": code }),
            ));
        };

        metrics::counter!("shortener_redirects_total", "outcome" => "found").increment(1);

        if self.analytics.is_enabled() {
            let event = RedirectEvent::new(link.id, link.short_url.clone(), visitor);
            let analytics = Arc::clone(&self.analytics);

            tokio::spawn(async move {
                if let Err(e) = analytics.publish(&event).await {
                    metrics::counter!("shortener_analytics_failures_total").increment(1);
                    warn!(error = %e, short_url = %event.short_url, "Analytics delivery dropped");
                }
            });
        }

        Ok(link.original_url)
    }

    /// Lists all active links.
    pub async fn list_active(&self) -> Result<Vec<Link>, AppError> {
        self.links.list_active().await
    }

    /// Checks that link storage is reachable.
    pub async fn ping_storage(&self) -> Result<(), AppError> {
        self.links.ping().await
    }

    /// Whether redirect events are forwarded anywhere.
    pub fn analytics_enabled(&self) -> bool {
        self.analytics.is_enabled()
    }

    async fn insert_desired(&self, original_url: String, code: String) -> Result<Link, AppError> {
        validate_custom_code(&code)?;

        let new_link = NewLink {
            original_url,
            short_url: code.clone(),
        };

        self.links.insert(new_link).await.map_err(|e| {
            if is_code_collision(&e) {
                warn!(short_url = %code, "Requested short code already taken");
                AppError::conflict(
                    "Short URL already exists. Please choose another one.",
                    json!({ "short_url": code }),
                )
            } else {
                e
            }
        })
    }

    async fn insert_generated(&self, original_url: String) -> Result<Link, AppError> {
        for attempt in 1..=MAX_ATTEMPTS {
            let new_link = NewLink {
                original_url: original_url.clone(),
                short_url: generate_code(self.code_length),
            };

            match self.links.insert(new_link).await {
                Ok(link) => return Ok(link),
                Err(e) if is_code_collision(&e) => {
                    metrics::counter!("shortener_code_collisions_total").increment(1);
                    debug!(attempt, "Generated short code collided, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(attempts = MAX_ATTEMPTS, "Short code generation exhausted");
        Err(AppError::GenerationExhausted {
            attempts: MAX_ATTEMPTS,
        })
    }
}
