// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Manual sync trigger.

use crate::error::Result;
use crate::services::SyncReport;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;

/// Sync routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/sync", post(run_sync))
}

/// Refresh the snapshot from Strava and report what changed.
async fn run_sync(State(state): State<Arc<AppState>>) -> Result<Json<SyncReport>> {
    tracing::info!("Sync requested");
    let report = state.sync().await?;
    Ok(Json(report))
}
