// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity sync service.
//!
//! Handles the core workflow:
//! 1. List every activity from Strava
//! 2. Convert units and drop zero-distance entries
//! 3. Fetch GPS streams for activities without a cached route
//! 4. Fall back to summary polylines where no stream is available
//!
//! Stream fetching runs under an error budget: after `max_stream_errors`
//! consecutive failures, or as soon as Strava rate limits us, the stream
//! phase stops and the sync completes with whatever it has.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;

use crate::error::Result;
use crate::models::{Activity, Route, RouteSource, Snapshot};
use crate::services::strava::{StravaActivitySummary, StravaService};
use crate::time_utils::split_local_start;

/// Strava reports kilojoules of mechanical work; this converts to kcal burned.
pub const KJ_TO_KCAL: f64 = 1.115;

/// Fetch activities and routes into a new snapshot.
#[derive(Clone)]
pub struct SyncService {
    strava: StravaService,
    max_stream_errors: usize,
}

/// Outcome of a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Activities kept after filtering
    pub activities: usize,
    /// Routes fetched from streams in this run
    pub streams_fetched: usize,
    /// Routes reused from the previous snapshot
    pub routes_cached: usize,
    /// Routes filled from summary polylines
    pub polyline_fallbacks: usize,
    /// Stream requests that failed (not counting missing resources)
    pub stream_errors: usize,
    /// Whether the stream phase stopped on the error budget
    pub aborted: bool,
}

impl SyncService {
    pub fn new(strava: StravaService, max_stream_errors: usize) -> Self {
        Self {
            strava,
            max_stream_errors: max_stream_errors.max(1),
        }
    }

    /// Run a full sync, reusing stream routes from `previous`.
    pub async fn sync(&self, previous: Option<&Snapshot>) -> Result<(Snapshot, SyncReport)> {
        let fetched_at = Utc::now();
        let summaries = self.strava.list_all_activities().await?;
        let activities: Vec<Activity> = summaries.iter().filter_map(convert_activity).collect();

        tracing::info!(
            listed = summaries.len(),
            kept = activities.len(),
            "Converted activities"
        );

        let mut report = SyncReport {
            activities: activities.len(),
            ..SyncReport::default()
        };

        // Only stream-sourced routes are final; polyline fallbacks get retried.
        let mut routes: HashMap<u64, Route> = previous
            .map(|s| {
                s.routes
                    .iter()
                    .filter(|r| r.source == RouteSource::Stream)
                    .map(|r| (r.activity_id, r.clone()))
                    .collect()
            })
            .unwrap_or_default();
        routes.retain(|id, _| activities.iter().any(|a| a.id == *id));
        report.routes_cached = routes.len();

        let mut consecutive_errors = 0;
        for activity in activities.iter().filter(|a| a.has_route()) {
            if routes.contains_key(&activity.id) {
                continue;
            }

            match self.strava.get_latlng_stream(activity.id).await {
                Ok(Some(coordinates)) => {
                    consecutive_errors = 0;
                    report.streams_fetched += 1;
                    routes.insert(
                        activity.id,
                        Route {
                            activity_id: activity.id,
                            source: RouteSource::Stream,
                            coordinates,
                        },
                    );
                }
                Ok(None) => {
                    consecutive_errors = 0;
                    tracing::debug!(activity_id = activity.id, "Activity has no GPS stream");
                }
                Err(e) if e.is_strava_not_found() => {
                    tracing::debug!(activity_id = activity.id, "Stream not found, skipping");
                }
                Err(e) => {
                    consecutive_errors += 1;
                    report.stream_errors += 1;
                    tracing::warn!(
                        activity_id = activity.id,
                        name = %activity.name,
                        error = %e,
                        consecutive_errors,
                        "Failed to fetch GPS stream"
                    );

                    if e.is_strava_rate_limit() {
                        tracing::warn!("Strava rate limit reached, stopping stream fetch");
                        report.aborted = true;
                        break;
                    }
                    if consecutive_errors >= self.max_stream_errors {
                        tracing::warn!(
                            budget = self.max_stream_errors,
                            "Stopping stream fetch due to request errors, try again later"
                        );
                        report.aborted = true;
                        break;
                    }
                }
            }
        }

        for activity in activities.iter().filter(|a| a.has_route()) {
            if routes.contains_key(&activity.id) {
                continue;
            }
            if let Some(route) = polyline_route(activity) {
                report.polyline_fallbacks += 1;
                routes.insert(activity.id, route);
            }
        }

        // Keep routes in activity order so output is stable.
        let routes: Vec<Route> = activities
            .iter()
            .filter_map(|a| routes.remove(&a.id))
            .collect();

        tracing::info!(
            activities = report.activities,
            routes = routes.len(),
            streams_fetched = report.streams_fetched,
            stream_errors = report.stream_errors,
            aborted = report.aborted,
            "Sync finished"
        );

        Ok((
            Snapshot {
                fetched_at,
                activities,
                routes,
            },
            report,
        ))
    }
}

/// Convert a Strava summary to our units, dropping zero-distance activities.
pub fn convert_activity(summary: &StravaActivitySummary) -> Option<Activity> {
    let distance_km = summary.distance / 1e3;
    if distance_km <= 0.0 {
        return None;
    }

    let Some((date, start_time)) = split_local_start(&summary.start_date_local) else {
        tracing::warn!(
            activity_id = summary.id,
            start_date_local = %summary.start_date_local,
            "Skipping activity with unparseable start date"
        );
        return None;
    };

    Some(Activity {
        id: summary.id,
        name: summary.name.clone(),
        sport_type: summary.sport_type.clone(),
        date,
        start_time,
        distance_km,
        moving_time_min: summary.moving_time / 60.0,
        average_speed_kmh: summary.average_speed * 3.6,
        max_speed_kmh: summary.max_speed * 3.6,
        elevation_m: summary.total_elevation_gain,
        average_power_watts: summary.average_watts,
        kcal: summary.kilojoules.map(|kj| kj * KJ_TO_KCAL),
        summary_polyline: summary
            .map
            .as_ref()
            .and_then(|m| m.summary_polyline.clone())
            .filter(|p| !p.is_empty()),
    })
}

/// Decode the activity's summary polyline (Strava format, precision 5).
fn polyline_route(activity: &Activity) -> Option<Route> {
    let encoded = activity.summary_polyline.as_deref()?;
    match polyline::decode_polyline(encoded, 5) {
        Ok(line) if !line.0.is_empty() => Some(Route::from_line_string(activity.id, &line)),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(activity_id = activity.id, error = %e, "Invalid summary polyline");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::strava::StravaMap;
    use chrono::{NaiveDate, NaiveTime};

    fn make_summary(id: u64, distance_m: f64) -> StravaActivitySummary {
        StravaActivitySummary {
            id,
            name: format!("Activity {}", id),
            sport_type: "Ride".to_string(),
            start_date_local: "2024-03-09T08:05:00Z".to_string(),
            distance: distance_m,
            moving_time: 5400.0,
            average_speed: 7.5,
            max_speed: 15.0,
            total_elevation_gain: 812.0,
            average_watts: Some(165.0),
            kilojoules: Some(1000.0),
            map: Some(StravaMap {
                summary_polyline: Some("_p~iF~ps|U_ulLnnqC_mqNvxq`@".to_string()),
            }),
        }
    }

    #[test]
    fn test_convert_activity_units() {
        let activity = convert_activity(&make_summary(1, 42_195.0)).unwrap();

        assert!((activity.distance_km - 42.195).abs() < 1e-9);
        assert!((activity.moving_time_min - 90.0).abs() < 1e-9);
        assert!((activity.average_speed_kmh - 27.0).abs() < 1e-9);
        assert!((activity.max_speed_kmh - 54.0).abs() < 1e-9);
        assert!((activity.kcal.unwrap() - 1115.0).abs() < 1e-9);
        assert_eq!(activity.elevation_m, 812.0);
        assert_eq!(activity.date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(activity.start_time, NaiveTime::from_hms_opt(8, 5, 0).unwrap());
    }

    #[test]
    fn test_convert_drops_zero_distance() {
        assert!(convert_activity(&make_summary(1, 0.0)).is_none());
    }

    #[test]
    fn test_convert_drops_bad_start_date() {
        let mut summary = make_summary(1, 1000.0);
        summary.start_date_local = "not a date".to_string();
        assert!(convert_activity(&summary).is_none());
    }

    #[test]
    fn test_convert_keeps_missing_power() {
        let mut summary = make_summary(1, 1000.0);
        summary.average_watts = None;
        summary.kilojoules = None;

        let activity = convert_activity(&summary).unwrap();
        assert!(activity.average_power_watts.is_none());
        assert!(activity.kcal.is_none());
    }

    #[test]
    fn test_polyline_route_decodes_lat_lon() {
        let activity = convert_activity(&make_summary(5, 1000.0)).unwrap();
        let route = polyline_route(&activity).unwrap();

        assert_eq!(route.activity_id, 5);
        assert_eq!(route.source, RouteSource::SummaryPolyline);
        assert_eq!(route.coordinates.len(), 3);
        let [lat, lon] = route.coordinates[0];
        assert!((lat - 38.5).abs() < 1e-9);
        assert!((lon + 120.2).abs() < 1e-9);
    }

    #[test]
    fn test_polyline_route_absent_without_polyline() {
        let mut summary = make_summary(5, 1000.0);
        summary.map = None;
        let activity = convert_activity(&summary).unwrap();
        assert!(polyline_route(&activity).is_none());
    }
}
