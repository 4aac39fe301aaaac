// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod charts;
pub mod map;
pub mod region;
pub mod strava;
pub mod sync;

pub use region::{RegionError, RegionService};
pub use strava::{StravaClient, StravaService};
pub use sync::{SyncReport, SyncService};
