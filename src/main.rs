// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava Atlas API Server
//!
//! Serves fitness analytics and route maps computed from a locally cached
//! snapshot of one athlete's Strava activities.

use std::sync::Arc;

use strava_atlas::{
    config::Config,
    db::SnapshotStore,
    services::{RegionService, StravaClient, StravaService, SyncService},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Strava Atlas API");

    // Load the cached snapshot, if any
    let store = SnapshotStore::new(&config.data_dir);
    let snapshot = store.load().await?;
    if snapshot.is_none() {
        tracing::warn!(path = %store.path().display(), "No snapshot cached yet");
    }

    // Load region boundaries
    let region_service = if config.regions_file.exists() {
        tracing::info!(path = %config.regions_file.display(), "Loading region boundaries");
        let service = RegionService::load_from_file(&config.regions_file)?;
        tracing::info!(count = service.regions().len(), "Region boundaries loaded");
        service
    } else {
        tracing::warn!(
            path = %config.regions_file.display(),
            "Region file not found; region maps will be empty"
        );
        RegionService::default()
    };

    // Initialize Strava + sync services
    let client = StravaClient::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
    );
    let strava_service = StravaService::new(client, config.strava_refresh_token.clone());
    let sync_service = SyncService::new(strava_service, config.max_stream_errors);

    // Build shared state
    let state = Arc::new(AppState::new(
        config.clone(),
        store,
        region_service,
        sync_service,
        snapshot,
    ));

    if config.sync_on_start {
        match state.sync().await {
            Ok(report) => tracing::info!(?report, "Startup sync complete"),
            Err(e) => tracing::error!(error = %e, "Startup sync failed; serving cached data"),
        }
    }

    // Build router
    let app = strava_atlas::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive("strava_atlas=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
