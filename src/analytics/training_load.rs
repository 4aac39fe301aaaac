// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training load and fitness/fatigue/form series.
//!
//! Implements the Performance Management Chart model over a daily axis:
//! - Training load: `100 * (power / FTP) * (minutes / 60)` per activity
//! - Fitness (CTL): exponential moving average with a 42-day time constant
//! - Fatigue (ATL): exponential moving average with a 7-day time constant
//! - Form (TSB): fitness minus fatigue
//!
//! The smoothing factor is `1 - e^(-1/T)`, which is the exact discretization
//! of a first-order decay with time constant `T` days.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::AnalyticsError;
use crate::models::Activity;

/// Default functional threshold power in watts.
pub const DEFAULT_FTP_WATTS: f64 = 180.0;
/// Fitness (CTL) time constant in days.
pub const FITNESS_TIME_CONSTANT_DAYS: f64 = 42.0;
/// Fatigue (ATL) time constant in days.
pub const FATIGUE_TIME_CONSTANT_DAYS: f64 = 7.0;
/// Days of zero load prepended before the first activity.
pub const LEAD_IN_DAYS: u64 = 7;
/// Longest series served, about a century of days.
///
/// The reference date comes from callers, so this bounds the allocation.
pub const MAX_AXIS_DAYS: i64 = 36_600;

/// What to do with activities recorded without a power meter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPowerPolicy {
    /// Score the activity as zero load. Its date still anchors the axis.
    #[default]
    Zero,
    /// Drop the activity before grouping.
    Skip,
}

/// Parameters for building the series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingLoadParams {
    pub ftp_watts: f64,
    pub missing_power: MissingPowerPolicy,
}

impl Default for TrainingLoadParams {
    fn default() -> Self {
        Self {
            ftp_watts: DEFAULT_FTP_WATTS,
            missing_power: MissingPowerPolicy::default(),
        }
    }
}

/// One row of the fitness/freshness series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyLoadPoint {
    pub date: NaiveDate,
    /// Sum of training load scores for the day (0 without activity)
    pub training_load: f64,
    pub fitness: f64,
    pub fatigue: f64,
    pub form: f64,
}

/// Training load score of a single activity.
pub fn training_load(moving_time_minutes: f64, average_power_watts: f64, ftp_watts: f64) -> f64 {
    100.0 * (average_power_watts / ftp_watts) * (moving_time_minutes / 60.0)
}

/// Smoothing factor for a given time constant in days.
pub fn smoothing_alpha(time_constant_days: f64) -> f64 {
    1.0 - (-1.0 / time_constant_days).exp()
}

/// Exponentially weighted moving average seeded with the first value.
///
/// `S[0] = x[0]`, `S[t] = alpha * x[t] + (1 - alpha) * S[t-1]`.
pub fn ewma(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &x in values {
        let s = match prev {
            None => x,
            Some(p) => alpha * x + (1.0 - alpha) * p,
        };
        out.push(s);
        prev = Some(s);
    }
    out
}

/// Build the daily fitness/fatigue/form series ending at `reference_date`.
///
/// The axis starts [`LEAD_IN_DAYS`] before the earliest activity. Activities
/// dated after `reference_date` fall outside the axis and are ignored.
pub fn build_fitness_freshness<'a, I>(
    activities: I,
    reference_date: NaiveDate,
    params: &TrainingLoadParams,
) -> Result<Vec<DailyLoadPoint>, AnalyticsError>
where
    I: IntoIterator<Item = &'a Activity>,
{
    if !params.ftp_watts.is_finite() || params.ftp_watts <= 0.0 {
        return Err(AnalyticsError::InvalidFtp(params.ftp_watts));
    }

    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for activity in activities {
        let Some(score) = activity_score(activity, params)? else {
            continue;
        };
        *daily.entry(activity.date).or_insert(0.0) += score;
    }

    let earliest = *daily
        .keys()
        .next()
        .ok_or(AnalyticsError::NoActivities)?;

    if reference_date < earliest {
        return Err(AnalyticsError::ReferenceBeforeActivities {
            reference: reference_date,
            earliest,
        });
    }

    let start = earliest
        .checked_sub_days(Days::new(LEAD_IN_DAYS))
        .ok_or(AnalyticsError::DateOutOfRange)?;

    let days = (reference_date - start).num_days() + 1;
    if days > MAX_AXIS_DAYS {
        return Err(AnalyticsError::AxisTooLong {
            days,
            max: MAX_AXIS_DAYS,
        });
    }

    let axis: Vec<NaiveDate> = start
        .iter_days()
        .take_while(|d| *d <= reference_date)
        .collect();
    let loads: Vec<f64> = axis
        .iter()
        .map(|d| daily.get(d).copied().unwrap_or(0.0))
        .collect();

    let fitness = ewma(&loads, smoothing_alpha(FITNESS_TIME_CONSTANT_DAYS));
    let fatigue = ewma(&loads, smoothing_alpha(FATIGUE_TIME_CONSTANT_DAYS));

    tracing::debug!(
        days = axis.len(),
        active_days = daily.len(),
        %start,
        %reference_date,
        "Built fitness/freshness series"
    );

    Ok(axis
        .into_iter()
        .zip(loads)
        .zip(fitness.into_iter().zip(fatigue))
        .map(|((date, training_load), (fitness, fatigue))| DailyLoadPoint {
            date,
            training_load,
            fitness,
            fatigue,
            form: fitness - fatigue,
        })
        .collect())
}

/// Score one activity, or `None` when the policy drops it.
fn activity_score(
    activity: &Activity,
    params: &TrainingLoadParams,
) -> Result<Option<f64>, AnalyticsError> {
    let minutes = activity.moving_time_min;
    if !minutes.is_finite() || minutes < 0.0 {
        return Err(AnalyticsError::InvalidActivity {
            id: activity.id,
            reason: format!("moving time {} min", minutes),
        });
    }

    match activity.average_power_watts {
        Some(watts) if !watts.is_finite() || watts < 0.0 => Err(AnalyticsError::InvalidActivity {
            id: activity.id,
            reason: format!("average power {} W", watts),
        }),
        Some(watts) => Ok(Some(training_load(minutes, watts, params.ftp_watts))),
        None => match params.missing_power {
            MissingPowerPolicy::Zero => Ok(Some(0.0)),
            MissingPowerPolicy::Skip => Ok(None),
        },
    }
}
