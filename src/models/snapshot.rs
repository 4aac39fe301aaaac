// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Point-in-time snapshot of everything fetched from Strava.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Activity, Route};

/// Cached activity table plus GPS routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the activity list was fetched
    pub fetched_at: DateTime<Utc>,
    /// Activities with positive distance, newest first (Strava order)
    pub activities: Vec<Activity>,
    /// GPS routes keyed by activity ID (at most one per activity)
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl Snapshot {
    /// Activities, optionally restricted to one sport type.
    pub fn activities_of(&self, sport_type: Option<&str>) -> Vec<&Activity> {
        self.activities
            .iter()
            .filter(|a| sport_type.map_or(true, |s| a.sport_type == s))
            .collect()
    }

    /// Look up an activity by ID.
    pub fn activity(&self, id: u64) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }
}
