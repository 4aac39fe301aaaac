// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod region;
pub mod route;
pub mod snapshot;

pub use activity::Activity;
pub use region::{Region, RegionSummary};
pub use route::{Route, RouteSource};
pub use snapshot::Snapshot;
