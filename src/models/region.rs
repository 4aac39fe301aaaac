// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Administrative region model and geometry handling.

use geo::{MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};

/// A named region (e.g. a municipality) with its boundary geometry.
#[derive(Debug, Clone)]
pub struct Region {
    /// Region name (e.g., "Girona")
    pub name: String,
    /// Boundary geometry (can be Polygon or MultiPolygon)
    pub geometry: RegionGeometry,
}

/// Region geometry - either a simple polygon or multi-polygon.
#[derive(Debug, Clone)]
pub enum RegionGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl RegionGeometry {
    /// Check if a line string intersects this geometry.
    pub fn intersects(&self, line: &geo::LineString<f64>) -> bool {
        use geo::Intersects;
        match self {
            RegionGeometry::Polygon(p) => line.intersects(p),
            RegionGeometry::MultiPolygon(mp) => line.intersects(mp),
        }
    }

    /// Check if a point lies strictly inside this geometry.
    pub fn contains(&self, point: &Point<f64>) -> bool {
        use geo::Contains;
        match self {
            RegionGeometry::Polygon(p) => p.contains(point),
            RegionGeometry::MultiPolygon(mp) => mp.contains(point),
        }
    }

    /// GeoJSON geometry value for map output.
    pub fn to_geojson(&self) -> geojson::Value {
        match self {
            RegionGeometry::Polygon(p) => geojson::Value::from(p),
            RegionGeometry::MultiPolygon(mp) => geojson::Value::from(mp),
        }
    }
}

/// Summary of a covered region for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSummary {
    pub name: String,
    /// Number of activities with at least one point inside the region
    pub activities: u32,
}
