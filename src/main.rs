use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod auth;
mod config;
mod db;
mod error;
mod metrics;
mod models;
mod services;
mod storage;

use crate::auth::jwt::JwtManager;
use crate::config::AppConfig;
use crate::db::Database;
use crate::storage::MediaStore;

pub struct AppState {
    pub db: Database,
    pub media: MediaStore,
    pub jwt: JwtManager,
    pub metrics_handle: PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "winkly_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = AppConfig::load()?;

    tracing::info!("Starting Winkly Backend v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.environment);

    // Initialize Prometheus metrics
    let metrics_handle = metrics::init_metrics()?;
    tracing::info!("Prometheus metrics initialized");

    // Initialize database (runs pending migrations)
    let db = Database::connect(&config.database_url).await?;
    tracing::info!("Database connected");

    // Initialize media store for profile images
    let media = MediaStore::new(PathBuf::from(&config.media_root), config.media_max_bytes).await?;

    // Session token manager
    let jwt = JwtManager::new(&config.jwt_secret, config.jwt_expiry_seconds);

    // Build application state
    let state = Arc::new(AppState {
        db,
        media,
        jwt,
        metrics_handle,
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_endpoint))
        .nest("/api/v1", api::routes::create_router(state.clone()))
        .layer(middleware::from_fn(api::middleware::metrics_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Result<&'static str, axum::http::StatusCode> {
    if state.db.health_check().await {
        Ok("OK")
    } else {
        Err(axum::http::StatusCode::SERVICE_UNAVAILABLE)
    }
}

/// Prometheus metrics endpoint
async fn metrics_endpoint(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> String {
    state.metrics_handle.render()
}
