// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only API routes over the cached snapshot.

use crate::analytics::{
    build_fitness_freshness, compute_eddington, DailyLoadPoint, EddingtonResult,
    MissingPowerPolicy, TrainingLoadParams,
};
use crate::error::{AppError, Result};
use crate::models::{Activity, RegionSummary, Snapshot};
use crate::services::charts::{default_range, scatter_series, ChartMetric, ScatterPoint};
use crate::services::map::{self, TileLayer};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use geo::Point;
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Initial zoom level for the route map.
const DEFAULT_ZOOM: u8 = 12;

/// API routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(get_activities))
        .route("/api/fitness", get(get_fitness))
        .route("/api/eddington", get(get_eddington))
        .route("/api/charts/{metric}", get(get_chart))
        .route("/api/map", get(get_map))
        .route("/api/map/routes", get(get_map_routes))
        .route("/api/map/regions", get(get_map_regions))
        .route("/api/stats/regions", get(get_region_stats))
}

/// Borrow the cached snapshot or report that nothing has been synced yet.
fn cached(snapshot: &Option<Snapshot>) -> Result<&Snapshot> {
    snapshot
        .as_ref()
        .ok_or_else(|| AppError::NotFound("No activities cached; run a sync first".to_string()))
}

#[derive(Deserialize)]
struct SportQuery {
    /// Restrict to one sport type (e.g. "Ride")
    sport_type: Option<String>,
}

// ─── Activities ──────────────────────────────────────────────

#[derive(Serialize)]
pub struct ActivitiesResponse {
    pub fetched_at: String,
    pub total: usize,
    pub activities: Vec<Activity>,
}

/// List cached activities, newest first.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SportQuery>,
) -> Result<Json<ActivitiesResponse>> {
    let guard = state.snapshot.read().await;
    let snapshot = cached(&guard)?;

    let activities: Vec<Activity> = snapshot
        .activities_of(params.sport_type.as_deref())
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ActivitiesResponse {
        fetched_at: format_utc_rfc3339(snapshot.fetched_at),
        total: activities.len(),
        activities,
    }))
}

// ─── Fitness / Freshness ─────────────────────────────────────

#[derive(Deserialize)]
struct FitnessQuery {
    /// Last day of the series (defaults to today)
    reference_date: Option<NaiveDate>,
    /// Override the configured FTP
    ftp: Option<f64>,
    #[serde(default)]
    missing_power: MissingPowerPolicy,
    sport_type: Option<String>,
}

#[derive(Serialize)]
pub struct FitnessResponse {
    pub ftp_watts: f64,
    pub missing_power: MissingPowerPolicy,
    /// Suggested x range: one day around the first and last activity
    pub range: Option<[NaiveDate; 2]>,
    pub points: Vec<DailyLoadPoint>,
}

/// Daily training load with fitness, fatigue and form.
async fn get_fitness(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FitnessQuery>,
) -> Result<Json<FitnessResponse>> {
    let guard = state.snapshot.read().await;
    let snapshot = cached(&guard)?;

    let activities = snapshot.activities_of(params.sport_type.as_deref());
    let reference_date = params
        .reference_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let training = TrainingLoadParams {
        ftp_watts: params.ftp.unwrap_or(state.config.ftp_watts),
        missing_power: params.missing_power,
    };

    tracing::debug!(
        activities = activities.len(),
        %reference_date,
        ftp = training.ftp_watts,
        "Building fitness series"
    );

    let points =
        build_fitness_freshness(activities.iter().copied(), reference_date, &training)?;

    Ok(Json(FitnessResponse {
        ftp_watts: training.ftp_watts,
        missing_power: training.missing_power,
        range: default_range(activities.iter().map(|a| a.date)),
        points,
    }))
}

// ─── Eddington ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct EddingtonResponse {
    pub sport_type: Option<String>,
    #[serde(flatten)]
    pub result: EddingtonResult,
}

/// Eddington number and the distance frequency table behind it.
async fn get_eddington(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SportQuery>,
) -> Result<Json<EddingtonResponse>> {
    let guard = state.snapshot.read().await;
    let snapshot = cached(&guard)?;

    let distances: Vec<f64> = snapshot
        .activities_of(params.sport_type.as_deref())
        .iter()
        .map(|a| a.distance_km)
        .collect();
    let result = compute_eddington(&distances)?;

    tracing::debug!(
        activities = distances.len(),
        number = result.number,
        "Computed Eddington number"
    );

    Ok(Json(EddingtonResponse {
        sport_type: params.sport_type,
        result,
    }))
}

// ─── Charts ──────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ChartResponse {
    pub metric: ChartMetric,
    pub label: &'static str,
    pub range: Option<[NaiveDate; 2]>,
    pub points: Vec<ScatterPoint>,
}

/// One activity field plotted against date.
async fn get_chart(
    State(state): State<Arc<AppState>>,
    Path(metric): Path<String>,
    Query(params): Query<SportQuery>,
) -> Result<Json<ChartResponse>> {
    let metric: ChartMetric = metric.parse()?;

    let guard = state.snapshot.read().await;
    let snapshot = cached(&guard)?;

    let points = scatter_series(snapshot.activities_of(params.sport_type.as_deref()), metric);

    Ok(Json(ChartResponse {
        metric,
        label: metric.label(),
        range: default_range(points.iter().map(|p| p.date)),
        points,
    }))
}

// ─── Map ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MapResponse {
    /// `[lat, lon]`, absent when no route is cached
    pub center: Option<[f64; 2]>,
    pub zoom: u8,
    pub tile_layers: Vec<TileLayer>,
}

/// Map setup: initial view and base layers.
async fn get_map(State(state): State<Arc<AppState>>) -> Result<Json<MapResponse>> {
    let guard = state.snapshot.read().await;
    let snapshot = cached(&guard)?;

    Ok(Json(MapResponse {
        center: map::map_center(&snapshot.routes),
        zoom: DEFAULT_ZOOM,
        tile_layers: map::tile_layers(),
    }))
}

/// All cached routes as GeoJSON.
async fn get_map_routes(State(state): State<Arc<AppState>>) -> Result<Json<FeatureCollection>> {
    let guard = state.snapshot.read().await;
    let snapshot = cached(&guard)?;

    Ok(Json(map::routes_geojson(snapshot)))
}

/// Regions that contain at least one route point, as GeoJSON.
async fn get_map_regions(State(state): State<Arc<AppState>>) -> Result<Json<FeatureCollection>> {
    let guard = state.snapshot.read().await;
    let snapshot = cached(&guard)?;

    let points: Vec<Point<f64>> = snapshot.routes.iter().flat_map(|r| r.points()).collect();
    let covered = state.region_service.covered_regions(&points);

    tracing::debug!(
        points = points.len(),
        covered = covered.len(),
        "Computed covered regions"
    );

    Ok(Json(map::regions_geojson(covered)))
}

// ─── Region Stats ────────────────────────────────────────────

#[derive(Serialize)]
pub struct RegionStatsResponse {
    pub regions: Vec<RegionSummary>,
    pub total_regions_visited: usize,
    pub total_regions: usize,
}

/// Per-region activity counts.
async fn get_region_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RegionStatsResponse>> {
    let guard = state.snapshot.read().await;
    let snapshot = cached(&guard)?;

    let regions = state.region_service.coverage_summary(&snapshot.routes);

    Ok(Json(RegionStatsResponse {
        total_regions_visited: regions.len(),
        total_regions: state.region_service.regions().len(),
        regions,
    }))
}
