// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived fitness analytics over the cached activity table.
//!
//! Both components are pure functions of their input: nothing is cached
//! between calls and every result is rebuilt from scratch.

pub mod eddington;
pub mod training_load;

pub use eddington::{compute_eddington, DistanceCount, EddingtonResult};
pub use training_load::{
    build_fitness_freshness, training_load, DailyLoadPoint, MissingPowerPolicy, TrainingLoadParams,
};

use chrono::NaiveDate;

/// Errors from the analytics layer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyticsError {
    #[error("No activities to build a training load series from")]
    NoActivities,

    #[error("No distances to compute an Eddington number from")]
    NoDistances,

    #[error("Functional threshold power must be a positive number, got {0}")]
    InvalidFtp(f64),

    #[error("Activity {id} is invalid: {reason}")]
    InvalidActivity { id: u64, reason: String },

    #[error("Distance at index {index} is invalid: {value}")]
    InvalidDistance { index: usize, value: f64 },

    #[error("Reference date {reference} is before the earliest activity on {earliest}")]
    ReferenceBeforeActivities {
        reference: NaiveDate,
        earliest: NaiveDate,
    },

    #[error("Date axis of {days} days exceeds the maximum of {max}")]
    AxisTooLong { days: i64, max: i64 },

    #[error("Date axis is out of the supported calendar range")]
    DateOutOfRange,
}
