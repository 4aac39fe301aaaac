// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava Atlas: fitness analytics and route maps from Strava activities
//!
//! This crate fetches one athlete's activities from Strava, caches them in a
//! local snapshot, and serves derived fitness metrics (training load,
//! fitness/fatigue/form, Eddington number) plus route and region maps.

pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::SnapshotStore;
use error::{AppError, Result};
use models::Snapshot;
use services::{RegionService, SyncReport, SyncService};
use tokio::sync::{Mutex, RwLock};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: SnapshotStore,
    pub region_service: RegionService,
    pub sync_service: SyncService,
    /// In-memory copy of the last saved snapshot
    pub snapshot: RwLock<Option<Snapshot>>,
    /// Serializes sync runs
    sync_lock: Mutex<()>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: SnapshotStore,
        region_service: RegionService,
        sync_service: SyncService,
        snapshot: Option<Snapshot>,
    ) -> Self {
        Self {
            config,
            store,
            region_service,
            sync_service,
            snapshot: RwLock::new(snapshot),
            sync_lock: Mutex::new(()),
        }
    }

    /// Fetch from Strava, persist the new snapshot and swap it in.
    ///
    /// Only one sync runs at a time; a second caller gets `Conflict`.
    pub async fn sync(&self) -> Result<SyncReport> {
        let _guard = self
            .sync_lock
            .try_lock()
            .map_err(|_| AppError::Conflict("A sync is already running".to_string()))?;

        let previous = self.snapshot.read().await.clone();
        let (snapshot, report) = self.sync_service.sync(previous.as_ref()).await?;

        self.store.save(&snapshot).await?;
        *self.snapshot.write().await = Some(snapshot);
        Ok(report)
    }
}
