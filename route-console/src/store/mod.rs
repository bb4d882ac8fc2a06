//! Route persistence.
//!
//! The route builder hands each validated payload to a [`RouteStore`]
//! exactly once. The store is the only asynchronous boundary in the
//! submission path; failures are reported back and never retried here.

mod error;
mod memory;
mod route_number;

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::route::RoutePayload;

pub use error::StoreError;
pub use memory::{InMemoryRouteStore, StoredRoute};
pub use route_number::RouteNumberGenerator;

/// Identifier assigned by the store to a persisted route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub u64);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persistence collaborator for routes.
///
/// This abstraction allows submissions to be tested against failing or
/// recording stores.
pub trait RouteStore: Send + Sync {
    /// Persist a validated route.
    fn create_route(
        &self,
        payload: RoutePayload,
    ) -> impl Future<Output = Result<RouteId, StoreError>> + Send;

    /// Remove a route.
    fn delete_route(&self, id: RouteId) -> impl Future<Output = Result<(), StoreError>> + Send;
}
