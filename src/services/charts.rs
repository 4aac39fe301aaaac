// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-activity scatter series for the chart front end.

use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::error::AppError;
use crate::models::Activity;

/// Activity fields that can be plotted against date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMetric {
    Distance,
    MovingTime,
    AverageSpeed,
    MaxSpeed,
    Elevation,
    AveragePower,
    Kcal,
}

impl ChartMetric {
    fn value(self, activity: &Activity) -> Option<f64> {
        match self {
            ChartMetric::Distance => Some(activity.distance_km),
            ChartMetric::MovingTime => Some(activity.moving_time_min),
            ChartMetric::AverageSpeed => Some(activity.average_speed_kmh),
            ChartMetric::MaxSpeed => Some(activity.max_speed_kmh),
            ChartMetric::Elevation => Some(activity.elevation_m),
            ChartMetric::AveragePower => activity.average_power_watts,
            ChartMetric::Kcal => activity.kcal,
        }
    }

    /// Axis label including units.
    pub fn label(self) -> &'static str {
        match self {
            ChartMetric::Distance => "distance [km]",
            ChartMetric::MovingTime => "moving time [min]",
            ChartMetric::AverageSpeed => "average speed [km/h]",
            ChartMetric::MaxSpeed => "max speed [km/h]",
            ChartMetric::Elevation => "elevation [m]",
            ChartMetric::AveragePower => "average power [W]",
            ChartMetric::Kcal => "energy [kcal]",
        }
    }
}

impl FromStr for ChartMetric {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "distance" => Ok(ChartMetric::Distance),
            "moving_time" => Ok(ChartMetric::MovingTime),
            "average_speed" => Ok(ChartMetric::AverageSpeed),
            "max_speed" => Ok(ChartMetric::MaxSpeed),
            "elevation" => Ok(ChartMetric::Elevation),
            "average_power" => Ok(ChartMetric::AveragePower),
            "kcal" => Ok(ChartMetric::Kcal),
            other => Err(AppError::BadRequest(format!("Unknown chart metric '{}'", other))),
        }
    }
}

/// One scatter point; `sport_type` drives the point color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub id: u64,
    pub date: NaiveDate,
    pub value: f64,
    pub name: String,
    pub sport_type: String,
}

/// Scatter points for `metric`, oldest first. Activities lacking the metric
/// are left out.
pub fn scatter_series<'a, I>(activities: I, metric: ChartMetric) -> Vec<ScatterPoint>
where
    I: IntoIterator<Item = &'a Activity>,
{
    let mut points: Vec<ScatterPoint> = activities
        .into_iter()
        .filter_map(|a| {
            Some(ScatterPoint {
                id: a.id,
                date: a.date,
                value: metric.value(a)?,
                name: a.name.clone(),
                sport_type: a.sport_type.clone(),
            })
        })
        .collect();
    points.sort_by_key(|p| (p.date, p.id));
    points
}

/// Default x-axis range: one day of padding around the data.
pub fn default_range<I>(dates: I) -> Option<[NaiveDate; 2]>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut iter = dates.into_iter();
    let first = iter.next()?;
    let (min, max) = iter.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some([
        min.checked_sub_days(Days::new(1)).unwrap_or(min),
        max.checked_add_days(Days::new(1)).unwrap_or(max),
    ])
}
