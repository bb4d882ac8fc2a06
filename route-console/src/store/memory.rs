//! In-process route store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::route::RoutePayload;

use super::error::StoreError;
use super::{RouteId, RouteStore};

/// A persisted route.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRoute {
    pub id: RouteId,
    pub payload: RoutePayload,
    pub created_at: DateTime<Utc>,
}

/// Route store backed by a map in memory.
///
/// Route numbers are unique across stored routes.
#[derive(Debug)]
pub struct InMemoryRouteStore {
    routes: RwLock<BTreeMap<RouteId, StoredRoute>>,
    next_id: AtomicU64,
}

impl Default for InMemoryRouteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRouteStore {
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Fetch a stored route.
    pub async fn get(&self, id: RouteId) -> Option<StoredRoute> {
        self.routes.read().await.get(&id).cloned()
    }

    /// All stored routes, oldest first.
    pub async fn list(&self) -> Vec<StoredRoute> {
        self.routes.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.routes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.routes.read().await.is_empty()
    }
}

impl RouteStore for InMemoryRouteStore {
    async fn create_route(&self, payload: RoutePayload) -> Result<RouteId, StoreError> {
        let mut routes = self.routes.write().await;

        if routes
            .values()
            .any(|r| r.payload.route_number == payload.route_number)
        {
            debug!(route_number = %payload.route_number, "rejecting duplicate route number");
            return Err(StoreError::DuplicateRouteNumber(
                payload.route_number.to_string(),
            ));
        }

        let id = RouteId(self.next_id.fetch_add(1, Ordering::Relaxed));
        info!(
            %id,
            route_number = %payload.route_number,
            stops = payload.stop_count(),
            "route stored"
        );
        routes.insert(
            id,
            StoredRoute {
                id,
                payload,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn delete_route(&self, id: RouteId) -> Result<(), StoreError> {
        let mut routes = self.routes.write().await;
        match routes.remove(&id) {
            Some(_) => {
                info!(%id, "route deleted");
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }
}
