// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GPS route model.

use geo::{Coord, LineString, Point};
use serde::{Deserialize, Serialize};

/// Where a route's coordinates came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    /// Full-resolution `latlng` stream.
    Stream,
    /// Decoded summary polyline (lower resolution).
    SummaryPolyline,
}

/// GPS track of one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub activity_id: u64,
    pub source: RouteSource,
    /// `[lat, lon]` pairs in recording order
    pub coordinates: Vec<[f64; 2]>,
}

impl Route {
    /// Route as a geo line string (x = lon, y = lat).
    pub fn line_string(&self) -> LineString<f64> {
        self.coordinates
            .iter()
            .map(|&[lat, lon]| Coord { x: lon, y: lat })
            .collect()
    }

    /// Route vertices as geo points (x = lon, y = lat).
    pub fn points(&self) -> impl Iterator<Item = Point<f64>> + '_ {
        self.coordinates
            .iter()
            .map(|&[lat, lon]| Point::new(lon, lat))
    }

    /// Build a route from a decoded polyline, which uses x = lon, y = lat.
    pub fn from_line_string(activity_id: u64, line: &LineString<f64>) -> Self {
        Self {
            activity_id,
            source: RouteSource::SummaryPolyline,
            coordinates: line.coords().map(|c| [c.y, c.x]).collect(),
        }
    }
}
