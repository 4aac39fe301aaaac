// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Split Strava's `start_date_local` into a calendar date and a wall time.
///
/// Strava encodes local time with a `Z` suffix even though it is not UTC, so
/// the offset is ignored and the wall-clock fields are kept as-is.
pub fn split_local_start(raw: &str) -> Option<(NaiveDate, NaiveTime)> {
    let local = DateTime::parse_from_rfc3339(raw).ok()?.naive_local();
    Some((local.date(), local.time()))
}
