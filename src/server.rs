//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, analytics wiring, the key rotation
//! task and the Axum server lifecycle.

use crate::application::key_rotation::run_key_rotation;
use crate::config::Config;
use crate::domain::repositories::{ApiKeyRepository, LinkRepository};
use crate::infrastructure::analytics::{AnalyticsPublisher, HttpAnalytics, NullAnalytics};
use crate::infrastructure::persistence::{PgApiKeyRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Analytics publisher (or NullAnalytics fallback)
/// - Background key rotation task
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Migrations applied");

    let pool_arc = Arc::new(pool.clone());
    let link_repository: Arc<dyn LinkRepository> =
        Arc::new(PgLinkRepository::new(pool_arc.clone()));
    let api_key_repository: Arc<dyn ApiKeyRepository> =
        Arc::new(PgApiKeyRepository::new(pool_arc));

    let state = AppState::new(
        link_repository,
        api_key_repository,
        build_analytics(&config),
        config.short_code_length,
    );

    let rotation = tokio::spawn(run_key_rotation(
        Arc::clone(&state.api_keys),
        config.key_rotation_interval(),
    ));

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    rotation.abort();
    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Opens the connection pool with the configured limits.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

fn build_analytics(config: &Config) -> Arc<dyn AnalyticsPublisher> {
    let Some(endpoint) = &config.metrics_service_url else {
        tracing::info!("Analytics disabled (NullAnalytics)");
        return Arc::new(NullAnalytics::new());
    };

    match HttpAnalytics::new(endpoint.clone(), config.metrics_timeout()) {
        Ok(analytics) => {
            tracing::info!(endpoint = %endpoint, "Analytics enabled");
            Arc::new(analytics)
        }
        Err(e) => {
            tracing::warn!("Failed to build analytics client: {}. Using NullAnalytics.", e);
            Arc::new(NullAnalytics::new())
        }
    }
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
