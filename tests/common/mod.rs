// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use strava_atlas::config::Config;
use strava_atlas::db::SnapshotStore;
use strava_atlas::models::{Activity, Route, RouteSource, Snapshot};
use strava_atlas::routes::create_router;
use strava_atlas::services::{RegionService, StravaClient, StravaService, SyncService};
use strava_atlas::AppState;

pub const REGIONS_FIXTURE: &str = "tests/fixtures/regions.geojson";

/// Fresh, unique directory under the system temp dir.
#[allow(dead_code)]
pub fn temp_data_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "strava-atlas-it-{}-{}-{}",
        name,
        std::process::id(),
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ))
}

#[allow(dead_code)]
pub fn load_test_regions() -> RegionService {
    RegionService::load_from_file(REGIONS_FIXTURE).expect("Failed to load region fixture")
}

#[allow(dead_code)]
pub fn activity(
    id: u64,
    sport_type: &str,
    date: (i32, u32, u32),
    distance_km: f64,
    moving_time_min: f64,
    average_power_watts: Option<f64>,
) -> Activity {
    Activity {
        id,
        name: format!("Activity {}", id),
        sport_type: sport_type.to_string(),
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        start_time: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
        distance_km,
        moving_time_min,
        average_speed_kmh: distance_km / (moving_time_min / 60.0),
        max_speed_kmh: 2.0 * distance_km / (moving_time_min / 60.0),
        elevation_m: 250.0,
        average_power_watts,
        kcal: average_power_watts.map(|w| w * moving_time_min * 60.0 / 1000.0 * 1.115),
        summary_polyline: None,
    }
}

#[allow(dead_code)]
pub fn route(activity_id: u64, coordinates: Vec<[f64; 2]>) -> Route {
    Route {
        activity_id,
        source: RouteSource::Stream,
        coordinates,
    }
}

/// Three activities; routes touch Northtown and Southville but not Farland.
#[allow(dead_code)]
pub fn sample_snapshot() -> Snapshot {
    Snapshot {
        fetched_at: Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap(),
        activities: vec![
            activity(3, "Ride", (2024, 3, 5), 45.0, 90.0, Some(180.0)),
            activity(2, "Run", (2024, 3, 3), 10.0, 50.0, None),
            activity(1, "Ride", (2024, 3, 1), 30.0, 60.0, Some(200.0)),
        ],
        routes: vec![
            route(1, vec![[37.45, -122.15], [37.46, -122.14], [37.47, -122.13]]),
            route(2, vec![[37.25, -122.15], [37.26, -122.16]]),
            route(3, vec![[37.45, -122.15], [37.35, -122.15], [37.25, -122.15]]),
        ],
    }
}

/// Create a test app over the given snapshot.
///
/// The Strava client points at a closed local port, so any sync attempt
/// fails fast without touching the network.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(snapshot: Option<Snapshot>) -> (axum::Router, Arc<AppState>) {
    let data_dir = temp_data_dir("app");
    let config = Config {
        data_dir: data_dir.clone(),
        regions_file: PathBuf::from(REGIONS_FIXTURE),
        ..Config::default()
    };

    let client = StravaClient::with_base_url(
        "http://127.0.0.1:9",
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
    );
    let strava_service = StravaService::new(client, config.strava_refresh_token.clone());
    let sync_service = SyncService::new(strava_service, config.max_stream_errors);

    let state = Arc::new(AppState::new(
        config,
        SnapshotStore::new(data_dir),
        load_test_regions(),
        sync_service,
        snapshot,
    ));

    (create_router(state.clone()), state)
}
