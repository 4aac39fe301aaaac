// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity model for the local snapshot and API.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Sport types that never carry a GPS route.
pub const NON_DISTANCE_SPORTS: [&str; 2] = ["WeightTraining", "Workout"];

/// Activity record after unit conversion.
///
/// Only activities with a positive distance are ever stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Strava activity ID
    pub id: u64,
    /// Activity name/title
    pub name: String,
    /// Sport type (Ride, Run, Hike, etc.)
    pub sport_type: String,
    /// Local calendar date the activity started on
    pub date: NaiveDate,
    /// Local start time
    pub start_time: NaiveTime,
    /// Distance in kilometers
    pub distance_km: f64,
    /// Moving time in minutes
    pub moving_time_min: f64,
    /// Average speed in km/h
    pub average_speed_kmh: f64,
    /// Max speed in km/h
    pub max_speed_kmh: f64,
    /// Total elevation gain in meters
    pub elevation_m: f64,
    /// Average power in watts (absent without a power meter)
    pub average_power_watts: Option<f64>,
    /// Energy estimate derived from kilojoules
    pub kcal: Option<f64>,
    /// Encoded summary polyline, used when no GPS stream is cached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_polyline: Option<String>,
}

impl Activity {
    /// Whether this activity type can have a GPS route at all.
    pub fn has_route(&self) -> bool {
        !NON_DISTANCE_SPORTS.contains(&self.sport_type.as_str())
    }
}
