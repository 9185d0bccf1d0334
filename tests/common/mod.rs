#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum::routing::get;
use axum::{Router, http::Request};
use chrono::{DateTime, Duration, Utc};
use link_shortener::api::handlers::health_handler;
use link_shortener::api::routes::{management_routes, redirect_routes};
use link_shortener::application::services::ApiKeyService;
use link_shortener::domain::entities::{ApiKey, Link, NewLink};
use link_shortener::domain::redirect_event::RedirectEvent;
use link_shortener::domain::repositories::{ApiKeyRepository, LinkRepository};
use link_shortener::error::AppError;
use link_shortener::infrastructure::analytics::{
    AnalyticsError, AnalyticsPublisher, NullAnalytics,
};
use link_shortener::state::AppState;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::Layer;
use uuid::Uuid;

pub const TEST_KEY: &str = "integration-test-key-0001";

/// Link storage backed by a map keyed by code.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<HashMap<String, Link>>,
    pub unavailable: AtomicBool,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, code: &str) -> Option<Link> {
        self.links.lock().unwrap().get(code).cloned()
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Storage(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.check_available()?;
        let mut links = self.links.lock().unwrap();

        if links.contains_key(&new_link.short_url) {
            return Err(AppError::DuplicateCode);
        }

        let link = Link::new(
            Uuid::new_v4(),
            new_link.original_url,
            new_link.short_url.clone(),
            Utc::now(),
        );
        links.insert(new_link.short_url, link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        self.check_available()?;
        Ok(self.get(code))
    }

    async fn find_active_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        self.check_available()?;
        Ok(self.get(code).filter(|link| link.is_active))
    }

    async fn list_active(&self) -> Result<Vec<Link>, AppError> {
        self.check_available()?;
        Ok(self
            .links
            .lock()
            .unwrap()
            .values()
            .filter(|link| link.is_active)
            .cloned()
            .collect())
    }

    async fn deactivate(&self, link: &Link) -> Result<Link, AppError> {
        self.check_available()?;
        let mut links = self.links.lock().unwrap();

        let stored = links
            .get_mut(&link.short_url)
            .ok_or_else(|| AppError::not_found("Short URL not found.", serde_json::json!({})))?;
        *stored = stored.clone().deactivated_at(Utc::now());

        Ok(stored.clone())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_available()
    }
}

/// Link storage where every insert collides.
#[derive(Default)]
pub struct CollidingLinkRepository {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl LinkRepository for CollidingLinkRepository {
    async fn insert(&self, _new_link: NewLink) -> Result<Link, AppError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AppError::DuplicateCode)
    }

    async fn find_by_code(&self, _code: &str) -> Result<Option<Link>, AppError> {
        Ok(None)
    }

    async fn find_active_by_code(&self, _code: &str) -> Result<Option<Link>, AppError> {
        Ok(None)
    }

    async fn list_active(&self) -> Result<Vec<Link>, AppError> {
        Ok(Vec::new())
    }

    async fn deactivate(&self, link: &Link) -> Result<Link, AppError> {
        Ok(link.clone())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Key storage backed by a vector in insertion order.
#[derive(Default)]
pub struct InMemoryApiKeyRepository {
    keys: Mutex<Vec<ApiKey>>,
}

impl InMemoryApiKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the hash of `secret` with the given expiry.
    pub fn seed(&self, secret: &str, expires_at: Option<DateTime<Utc>>) {
        self.keys.lock().unwrap().push(ApiKey {
            id: Uuid::new_v4(),
            key_hash: ApiKeyService::<Self>::hash_key(secret),
            created_at: Utc::now(),
            expires_at,
        });
    }

    pub fn len(&self) -> usize {
        self.keys.lock().unwrap().len()
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn insert(
        &self,
        key_hash: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ApiKey, AppError> {
        let key = ApiKey {
            id: Uuid::new_v4(),
            key_hash: key_hash.to_string(),
            created_at: Utc::now(),
            expires_at,
        };
        self.keys.lock().unwrap().push(key.clone());
        Ok(key)
    }

    async fn find_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, AppError> {
        Ok(self
            .keys
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|key| key.key_hash == key_hash)
            .cloned())
    }

    async fn latest(&self) -> Result<Option<ApiKey>, AppError> {
        Ok(self.keys.lock().unwrap().last().cloned())
    }

    async fn exists_any(&self) -> Result<bool, AppError> {
        Ok(!self.keys.lock().unwrap().is_empty())
    }

    async fn list(&self) -> Result<Vec<ApiKey>, AppError> {
        Ok(self.keys.lock().unwrap().iter().rev().cloned().collect())
    }
}

/// Publisher that records every delivered event.
#[derive(Default)]
pub struct RecordingAnalytics {
    pub events: Mutex<Vec<RedirectEvent>>,
}

#[async_trait]
impl AnalyticsPublisher for RecordingAnalytics {
    async fn publish(&self, event: &RedirectEvent) -> Result<(), AnalyticsError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

impl RecordingAnalytics {
    /// Waits briefly for detached deliveries to land.
    pub async fn wait_for(&self, count: usize) -> Vec<RedirectEvent> {
        for _ in 0..50 {
            if self.events.lock().unwrap().len() >= count {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        self.events.lock().unwrap().clone()
    }
}

pub struct TestContext {
    pub links: Arc<InMemoryLinkRepository>,
    pub keys: Arc<InMemoryApiKeyRepository>,
    pub state: AppState,
}

/// State over in-memory storage with [`TEST_KEY`] valid for a week.
pub fn create_test_context() -> TestContext {
    create_test_context_with_analytics(Arc::new(NullAnalytics::new()))
}

pub fn create_test_context_with_analytics(analytics: Arc<dyn AnalyticsPublisher>) -> TestContext {
    let links = Arc::new(InMemoryLinkRepository::new());
    let keys = Arc::new(InMemoryApiKeyRepository::new());
    keys.seed(TEST_KEY, Some(Utc::now() + Duration::weeks(1)));

    let state = AppState::new(links.clone(), keys.clone(), analytics, 6);

    TestContext { links, keys, state }
}

/// All routes without rate limiting, with a fixed peer address.
pub fn test_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(management_routes())
        .merge(redirect_routes())
        .layer(MockConnectInfoLayer)
        .with_state(state)
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
