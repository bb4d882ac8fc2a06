//! Location name lookup.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::LocationRef;

use super::client::{CatalogClient, LocationDto};
use super::error::CatalogError;

/// Display data for a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationInfo {
    pub name: String,
    pub city: String,
}

/// A search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationMatch {
    pub location: LocationRef,
    pub name: String,
    pub city: String,
}

/// Thread-safe location lookup.
///
/// Provides `LocationRef` → name/city mapping with support for background
/// refresh. The route builder never writes to the catalog.
#[derive(Clone)]
pub struct LocationNames {
    inner: Arc<RwLock<HashMap<LocationRef, LocationInfo>>>,
    client: Option<CatalogClient>,
}

impl LocationNames {
    /// Create a lookup by fetching from the catalog API.
    pub async fn fetch(client: CatalogClient) -> Result<Self, CatalogError> {
        let locations = client.fetch_locations().await?;
        Ok(Self::with_entries(locations, Some(client)))
    }

    /// Create a lookup from already-loaded entries (disk snapshot, tests).
    ///
    /// A client, if given, is used for later refreshes.
    pub fn with_entries(locations: Vec<LocationDto>, client: Option<CatalogClient>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(build_map(locations))),
            client,
        }
    }

    /// Look up a location.
    pub async fn get(&self, location: &LocationRef) -> Option<LocationInfo> {
        let guard = self.inner.read().await;
        guard.get(location).cloned()
    }

    /// Display name for a location, falling back to the raw reference.
    pub async fn display_name(&self, location: &LocationRef) -> String {
        match self.get(location).await {
            Some(info) => format!("{}, {}", info.name, info.city),
            None => location.to_string(),
        }
    }

    /// Case-insensitive substring search over names and cities.
    ///
    /// Exact id matches come first, then name matches, then city-only
    /// matches; ties are ordered by name.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<LocationMatch> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let guard = self.inner.read().await;
        let mut hits: Vec<(u8, LocationMatch)> = guard
            .iter()
            .filter_map(|(loc, info)| {
                let rank = if loc.as_str().to_lowercase() == needle {
                    0
                } else if info.name.to_lowercase().contains(&needle) {
                    1
                } else if info.city.to_lowercase().contains(&needle) {
                    2
                } else {
                    return None;
                };
                Some((
                    rank,
                    LocationMatch {
                        location: loc.clone(),
                        name: info.name.clone(),
                        city: info.city.clone(),
                    },
                ))
            })
            .collect();

        hits.sort_by(|(ra, a), (rb, b)| ra.cmp(rb).then_with(|| a.name.cmp(&b.name)));
        hits.into_iter().take(limit).map(|(_, m)| m).collect()
    }

    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    pub async fn is_empty(&self) -> bool {
        let guard = self.inner.read().await;
        guard.is_empty()
    }

    /// Current entries as DTOs, for writing a disk snapshot.
    pub async fn snapshot(&self) -> Vec<LocationDto> {
        let guard = self.inner.read().await;
        let mut out: Vec<LocationDto> = guard
            .iter()
            .map(|(loc, info)| LocationDto {
                id: loc.to_string(),
                name: info.name.clone(),
                city: info.city.clone(),
            })
            .collect();
        out.sort_by(|a, b| a.id.cmp(&b.id));
        out
    }

    /// Refresh from the catalog API.
    ///
    /// On success, replaces the current mapping. On failure, the existing
    /// mapping is preserved and the error is returned.
    pub async fn refresh(&self) -> Result<usize, CatalogError> {
        let client = self.client.as_ref().ok_or(CatalogError::NotConfigured)?;
        let locations = client.fetch_locations().await?;
        let map = build_map(locations);
        let count = map.len();

        let mut guard = self.inner.write().await;
        *guard = map;

        Ok(count)
    }
}

/// Build the reference → info map, skipping entries with blank ids.
fn build_map(locations: Vec<LocationDto>) -> HashMap<LocationRef, LocationInfo> {
    locations
        .into_iter()
        .filter_map(|l| {
            LocationRef::new(l.id).ok().map(|loc| {
                (
                    loc,
                    LocationInfo {
                        name: l.name,
                        city: l.city,
                    },
                )
            })
        })
        .collect()
}
