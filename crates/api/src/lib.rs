//! # Slotkeeper API
//!
//! HTTP surface of the availability engine. Every provider-scoped route lives
//! under `/api/organizations/:org_id/providers/:provider_id`.
//!
//! ## Architecture
//!
//! - **Routes**: endpoint paths and methods
//! - **Handlers**: request parsing, organization scoping and engine calls
//! - **Middleware**: error-to-status mapping
//! - **Config**: environment configuration for the server and engine
//!
//! Authentication is expected in front of this service. Handlers trust the
//! organization and provider ids in the path, apart from refusing a provider
//! whose stored profile belongs to another organization.

/// Configuration module for API and engine settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error mapping shared by every handler
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use eyre::{Result, WrapErr};
use slotkeeper_core::AvailabilityEngine;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub engine: AvailabilityEngine,
    /// Name of the backing store, reported by `/health`
    pub storage: &'static str,
}

/// Installs the global `tracing` subscriber.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Builds the application router with every route attached to `state`.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Provider directory
        .merge(routes::provider::routes())
        // Base week and overrides
        .merge(routes::schedule::routes())
        // Booking occupancy
        .merge(routes::occupancy::routes())
        // Resolved windows and status
        .merge(routes::availability::routes())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .wrap_err("Invalid origin in API_CORS_ORIGINS")?;

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true))
}

/// Starts the API server around an already-built engine
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// use std::sync::Arc;
/// use slotkeeper_api::{config::ApiConfig, start_server};
/// use slotkeeper_core::{AvailabilityEngine, Stores};
/// use slotkeeper_db::MemoryStore;
///
/// let config = ApiConfig::from_env()?;
/// let stores = Stores::shared(Arc::new(MemoryStore::new()));
/// let engine = AvailabilityEngine::new(stores, config.engine.clone());
/// start_server(config, engine, "memory").await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(
    config: config::ApiConfig,
    engine: AvailabilityEngine,
    storage: &'static str,
) -> Result<()> {
    let state = Arc::new(ApiState { engine, storage });
    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
