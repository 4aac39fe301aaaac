// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map layer assembly: route and region GeoJSON, popups, tile layers.

use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;
use serde_json::json;

use crate::models::{Activity, Region, Route, Snapshot};

/// A selectable base tile layer for the map front end.
#[derive(Debug, Clone, Serialize)]
pub struct TileLayer {
    pub name: &'static str,
    pub url: &'static str,
    pub attribution: &'static str,
}

/// Base layers offered by the map, default first.
pub fn tile_layers() -> Vec<TileLayer> {
    vec![
        TileLayer {
            name: "OpenStreetMap",
            url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors",
        },
        TileLayer {
            name: "CyclOSM",
            url: "https://{s}.tile-cyclosm.openstreetmap.fr/cyclosm/{z}/{x}/{y}.png",
            attribution: "<a href=\"https://github.com/cyclosm/cyclosm-cartocss-style/releases\" title=\"CyclOSM - Open Bicycle render\">CyclOSM</a> | Map data: &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors",
        },
        TileLayer {
            name: "MtbMap",
            url: "http://tile.mtbmap.cz/mtbmap_tiles/{z}/{x}/{y}.png",
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &amp; USGS",
        },
        TileLayer {
            name: "Esri.WorldImagery",
            url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
            attribution: "Tiles &copy; Esri &mdash; Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, Getmapping, Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community",
        },
    ]
}

/// Median of a list of values; `None` when empty.
fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

/// Initial map center as `[lat, lon]`.
///
/// Takes the median point of each route, then the median of those, which
/// keeps one long trip from dragging the view away from home.
pub fn map_center(routes: &[Route]) -> Option<[f64; 2]> {
    let per_route: Vec<[f64; 2]> = routes
        .iter()
        .filter_map(|r| {
            let lat = median(r.coordinates.iter().map(|c| c[0]).collect())?;
            let lon = median(r.coordinates.iter().map(|c| c[1]).collect())?;
            Some([lat, lon])
        })
        .collect();

    let lat = median(per_route.iter().map(|c| c[0]).collect())?;
    let lon = median(per_route.iter().map(|c| c[1]).collect())?;
    Some([lat, lon])
}

/// HTML tooltip shown when hovering a route.
pub fn popup_html(activity: &Activity) -> String {
    format!(
        "<b>{}</b><ul><li>{} {}</li><li>Distance:&nbsp;{:.2}&nbsp;km</li><li>Elevation:&nbsp;{:.0}&nbsp;m</li></ul>",
        html_escape::encode_text(&activity.name),
        activity.date,
        activity.start_time.format("%H:%M:%S"),
        activity.distance_km,
        activity.elevation_m,
    )
}

/// Routes as GeoJSON LineStrings with activity properties.
///
/// Routes without a matching activity or with fewer than two points are
/// left out.
pub fn routes_geojson(snapshot: &Snapshot) -> FeatureCollection {
    let features = snapshot
        .routes
        .iter()
        .filter(|r| r.coordinates.len() >= 2)
        .filter_map(|route| {
            let activity = snapshot.activity(route.activity_id)?;

            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), json!(activity.name));
            properties.insert("sport_type".to_string(), json!(activity.sport_type));
            properties.insert("distance".to_string(), json!(activity.distance_km));
            properties.insert("moving_time".to_string(), json!(activity.moving_time_min));
            properties.insert("elevation".to_string(), json!(activity.elevation_m));
            properties.insert("date".to_string(), json!(activity.date));
            properties.insert("source".to_string(), json!(route.source));
            properties.insert("popup".to_string(), json!(popup_html(activity)));

            Some(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::from(&route.line_string()))),
                id: Some(Id::Number(activity.id.into())),
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Regions as GeoJSON polygons carrying their name.
pub fn regions_geojson<'a, I>(regions: I) -> FeatureCollection
where
    I: IntoIterator<Item = &'a Region>,
{
    let features = regions
        .into_iter()
        .map(|region| {
            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), json!(region.name));
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(region.geometry.to_geojson())),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
