// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{routing::{get, post}, Router};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::history_service::HistoricalService;
use crate::application::live_service::LiveTrackingService;
use crate::application::waypoint_cache::WaypointCache;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_repository::HttpFleetRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    aircraft_options, clear_selection, health_check, history_dashboard, live_overlay, live_snapshot,
    select_flight,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config().context("Failed to load dashboard configuration")?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(HttpFleetRepository::new(
        config.backend.base_url.clone(),
        config.backend.timeout(),
    )?);

    // Create services (application layer)
    let waypoint_cache = WaypointCache::new(repository.clone(), config.cache.waypoint_capacity);
    let live_service = LiveTrackingService::new(repository.clone(), waypoint_cache);
    let history_service = HistoricalService::new(repository.clone());

    let poller = live_service.start_polling(config.polling.interval());

    // Create application state
    let state = Arc::new(AppState {
        live_service,
        history_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/live", get(live_snapshot))
        .route("/live/overlay", get(live_overlay))
        .route("/live/selection", post(select_flight).delete(clear_selection))
        .route("/history", get(history_dashboard))
        .route("/history/aircraft", get(aircraft_options))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.server.listen_addr))?;
    tracing::info!(
        "Starting uam-fleet-dashboard on {} (backend {})",
        addr,
        config.backend.base_url
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let served = axum::serve(listener, router).await;

    poller.abort();
    served?;

    Ok(())
}
