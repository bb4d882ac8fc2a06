//! On-disk snapshot of the location catalog.
//!
//! Lets the console start with location names even when the catalog API is
//! down. A fresh snapshot is preferred over a network fetch at startup; a
//! stale one is only used when the fetch fails.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::client::LocationDto;
use super::error::CatalogError;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    saved_at: DateTime<Utc>,
    locations: Vec<LocationDto>,
}

/// A loaded snapshot, with whether it is still within its freshness window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub saved_at: DateTime<Utc>,
    pub locations: Vec<LocationDto>,
    pub fresh: bool,
}

/// Where the snapshot lives and how long it stays fresh.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    pub path: PathBuf,
    pub max_age: TimeDelta,
}

impl SnapshotConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_age: TimeDelta::hours(24),
        }
    }

    pub fn with_max_age(mut self, max_age: TimeDelta) -> Self {
        self.max_age = max_age;
        self
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self::new("locations_cache.json")
    }
}

#[derive(Debug, Clone)]
pub struct LocationSnapshot {
    config: SnapshotConfig,
}

impl LocationSnapshot {
    pub fn new(config: SnapshotConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Read the snapshot as of `now`.
    ///
    /// Returns `None` if the file is missing or unreadable. Stale snapshots
    /// are returned with `fresh == false`.
    pub fn load_at(&self, now: DateTime<Utc>) -> Option<Snapshot> {
        let contents = std::fs::read_to_string(&self.config.path).ok()?;
        let file: SnapshotFile = serde_json::from_str(&contents).ok()?;
        let fresh = now.signed_duration_since(file.saved_at) < self.config.max_age;
        Some(Snapshot {
            saved_at: file.saved_at,
            locations: file.locations,
            fresh,
        })
    }

    pub fn load(&self) -> Option<Snapshot> {
        self.load_at(Utc::now())
    }

    /// Write the snapshot, replacing any previous one.
    ///
    /// The file is written next to the target and renamed into place so a
    /// crash never leaves a half-written snapshot.
    pub fn save(&self, locations: &[LocationDto]) -> Result<(), CatalogError> {
        self.save_at(locations, Utc::now())
    }

    pub fn save_at(
        &self,
        locations: &[LocationDto],
        now: DateTime<Utc>,
    ) -> Result<(), CatalogError> {
        let file = SnapshotFile {
            saved_at: now,
            locations: locations.to_vec(),
        };

        if let Some(parent) = self.config.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| CatalogError::Cache {
                message: format!("failed to create snapshot directory: {e}"),
            })?;
        }

        let json = serde_json::to_string_pretty(&file).map_err(|e| CatalogError::Cache {
            message: format!("failed to serialize snapshot: {e}"),
        })?;

        let tmp = self.config.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| CatalogError::Cache {
            message: format!("failed to write snapshot: {e}"),
        })?;
        std::fs::rename(&tmp, &self.config.path).map_err(|e| CatalogError::Cache {
            message: format!("failed to move snapshot into place: {e}"),
        })?;

        Ok(())
    }
}
