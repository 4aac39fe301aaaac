// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON snapshot store on local disk.
//!
//! Holds exactly one point-in-time snapshot. Saving writes a sibling temp
//! file and renames it over the old one, so readers see either the previous
//! or the new snapshot, never a partial file.

use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::models::Snapshot;

const SNAPSHOT_FILE: &str = "activities.json";

/// File-backed snapshot store.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    /// Load the snapshot, or `None` if nothing has been saved yet.
    pub async fn load(&self) -> Result<Option<Snapshot>, AppError> {
        let path = self.path();
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let snapshot: Snapshot = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::Storage(format!("Corrupt snapshot {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            activities = snapshot.activities.len(),
            routes = snapshot.routes.len(),
            "Loaded snapshot"
        );
        Ok(Some(snapshot))
    }

    /// Replace the stored snapshot.
    pub async fn save(&self, snapshot: &Snapshot) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Storage(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| AppError::Storage(format!("Failed to encode snapshot: {}", e)))?;

        let path = self.path();
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            AppError::Storage(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            activities = snapshot.activities.len(),
            routes = snapshot.routes.len(),
            "Saved snapshot"
        );
        Ok(())
    }
}
