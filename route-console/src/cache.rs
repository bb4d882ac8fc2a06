//! Caching layer for the bus list.
//!
//! The new-route form and the bus assignment check both need the list of
//! assignable buses. The list changes rarely, so responses are cached per
//! operator filter for a short TTL.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::catalog::{BusDto, CatalogClient, CatalogError};
use crate::domain::BusRef;

/// Cache key: the operator filter, `None` meaning every operator.
type BusKey = Option<String>;

/// Cached bus list.
type BusEntry = Arc<Vec<BusDto>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 100,
        }
    }
}

/// Where bus lists come from.
#[derive(Debug, Clone)]
pub enum BusSource {
    /// The back-office catalog API.
    Remote(CatalogClient),
    /// A fixed list, used when no catalog is configured and in tests.
    Fixed(Vec<BusDto>),
}

impl BusSource {
    async fn load(&self, operator: Option<&str>) -> Result<Vec<BusDto>, CatalogError> {
        match self {
            BusSource::Remote(client) => client.fetch_buses(operator).await,
            BusSource::Fixed(buses) => Ok(buses
                .iter()
                .filter(|b| operator.is_none_or(|op| b.operator_id == op))
                .cloned()
                .collect()),
        }
    }
}

/// Bus list with caching.
pub struct BusDirectory {
    source: BusSource,
    lists: MokaCache<BusKey, BusEntry>,
}

impl BusDirectory {
    pub fn new(source: BusSource, config: &CacheConfig) -> Self {
        let lists = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { source, lists }
    }

    /// Assignable buses, optionally filtered by operator.
    pub async fn buses(&self, operator: Option<&str>) -> Result<BusEntry, CatalogError> {
        let key: BusKey = operator.map(str::to_string);

        if let Some(cached) = self.lists.get(&key).await {
            return Ok(cached);
        }

        let entry = Arc::new(self.source.load(operator).await?);
        tracing::debug!(
            operator = operator.unwrap_or("*"),
            count = entry.len(),
            "cached bus list"
        );
        self.lists.insert(key, entry.clone()).await;

        Ok(entry)
    }

    /// Look up a single bus in the unfiltered list.
    pub async fn find(&self, bus: &BusRef) -> Result<Option<BusDto>, CatalogError> {
        let all = self.buses(None).await?;
        Ok(all.iter().find(|b| b.id == bus.as_str()).cloned())
    }
}
