// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Region boundary loading and route coverage detection.

use crate::models::region::{Region, RegionGeometry, RegionSummary};
use crate::models::Route;
use geo::{LineString, MultiPolygon, Point, Polygon};
use geojson::GeoJson;
use std::fs;
use std::path::Path;

/// Service for loading regions and checking which ones routes pass through.
#[derive(Default, Clone)]
pub struct RegionService {
    regions: Vec<Region>,
}

impl RegionService {
    /// Load regions from a GeoJSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegionError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| RegionError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load regions from a GeoJSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, RegionError> {
        let geojson: GeoJson = json_data
            .parse()
            .map_err(|e: geojson::Error| RegionError::ParseError(e.to_string()))?;

        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(RegionError::NotFeatureCollection);
        };

        let mut regions = Vec::new();
        for feature in collection.features {
            let name = feature
                .property("name")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown")
                .to_string();

            if let Some(geom) = feature.geometry {
                let geometry = Self::convert_geometry(geom.value)?;
                regions.push(Region { name, geometry });
            }
        }

        tracing::info!(count = regions.len(), "Loaded regions");
        Ok(Self { regions })
    }

    /// Convert GeoJSON geometry to our internal format.
    fn convert_geometry(value: geojson::Value) -> Result<RegionGeometry, RegionError> {
        match value {
            geojson::Value::Polygon(_) => Polygon::<f64>::try_from(value)
                .map(RegionGeometry::Polygon)
                .map_err(|e| RegionError::ParseError(e.to_string())),
            geojson::Value::MultiPolygon(_) => MultiPolygon::<f64>::try_from(value)
                .map(RegionGeometry::MultiPolygon)
                .map_err(|e| RegionError::ParseError(e.to_string())),
            _ => Err(RegionError::UnsupportedGeometry),
        }
    }

    /// Get the list of regions.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Regions containing at least one of the points, in file order.
    pub fn covered_regions<'a, I>(&self, points: I) -> Vec<&Region>
    where
        I: IntoIterator<Item = &'a Point<f64>>,
    {
        let mut covered = vec![false; self.regions.len()];
        for point in points {
            for (i, region) in self.regions.iter().enumerate() {
                if !covered[i] && region.geometry.contains(point) {
                    covered[i] = true;
                }
            }
            if covered.iter().all(|&c| c) {
                break;
            }
        }

        self.regions
            .iter()
            .zip(covered)
            .filter_map(|(region, hit)| hit.then_some(region))
            .collect()
    }

    /// Count, for each region, how many routes have a point inside it.
    ///
    /// Regions no route reaches are omitted. Sorted by count, then name.
    pub fn coverage_summary(&self, routes: &[Route]) -> Vec<RegionSummary> {
        let mut counts = vec![0u32; self.regions.len()];
        for route in routes {
            let points: Vec<Point<f64>> = route.points().collect();
            for (i, region) in self.regions.iter().enumerate() {
                if points.iter().any(|p| region.geometry.contains(p)) {
                    counts[i] += 1;
                }
            }
        }

        let mut summaries: Vec<RegionSummary> = self
            .regions
            .iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(region, activities)| RegionSummary {
                name: region.name.clone(),
                activities,
            })
            .collect();
        summaries.sort_by(|a, b| b.activities.cmp(&a.activities).then_with(|| a.name.cmp(&b.name)));
        summaries
    }

    /// Find all regions that intersect with a given line string.
    pub fn find_intersections(&self, line: &LineString<f64>) -> Vec<String> {
        self.regions
            .iter()
            .filter(|r| r.geometry.intersects(line))
            .map(|r| r.name.clone())
            .collect()
    }
}

/// Errors from region operations.
#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse GeoJSON: {0}")]
    ParseError(String),

    #[error("Expected a GeoJSON FeatureCollection")]
    NotFeatureCollection,

    #[error("Unsupported geometry type (expected Polygon or MultiPolygon)")]
    UnsupportedGeometry,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SQUARES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "West" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[2.0, 0.0], [3.0, 0.0], [3.0, 1.0], [2.0, 1.0], [2.0, 0.0]]]]
                }
            }
        ]
    }"#;

    #[test]
    fn test_load_polygon_and_multipolygon() {
        let service = RegionService::load_from_json(TWO_SQUARES).unwrap();
        let names: Vec<&str> = service.regions().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["West", "Unknown"]);
    }

    #[test]
    fn test_covered_regions_dedups_in_file_order() {
        let service = RegionService::load_from_json(TWO_SQUARES).unwrap();
        let points = vec![
            Point::new(2.5, 0.5),
            Point::new(0.5, 0.5),
            Point::new(0.6, 0.6),
            Point::new(10.0, 10.0),
        ];

        let covered: Vec<&str> = service
            .covered_regions(&points)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(covered, vec!["West", "Unknown"]);
    }

    #[test]
    fn test_point_outside_everything() {
        let service = RegionService::load_from_json(TWO_SQUARES).unwrap();
        assert!(service.covered_regions(&[Point::new(1.5, 0.5)]).is_empty());
    }

    #[test]
    fn test_line_crossing_gap_intersects_both() {
        let service = RegionService::load_from_json(TWO_SQUARES).unwrap();
        let line = LineString::from(vec![(0.5, 0.5), (2.5, 0.5)]);
        assert_eq!(service.find_intersections(&line), vec!["West", "Unknown"]);
    }

    #[test]
    fn test_rejects_point_geometry() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"name": "P"},
             "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}}
        ]}"#;
        assert!(matches!(
            RegionService::load_from_json(json),
            Err(RegionError::UnsupportedGeometry)
        ));
    }

    #[test]
    fn test_rejects_bare_geometry() {
        let json = r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#;
        assert!(matches!(
            RegionService::load_from_json(json),
            Err(RegionError::NotFeatureCollection)
        ));
    }
}
