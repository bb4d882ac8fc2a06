//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::BusDirectory;
use crate::catalog::LocationNames;
use crate::route::RouteValidator;
use crate::store::{InMemoryRouteStore, RouteNumberGenerator};

/// Shared application state.
///
/// Each request builds its own `RouteSubmission`; only these services are
/// shared.
#[derive(Clone)]
pub struct AppState {
    /// Stored routes
    pub store: Arc<InMemoryRouteStore>,

    /// Submission validator
    pub validator: Arc<RouteValidator>,

    /// Route numbers for new forms
    pub route_numbers: Arc<RouteNumberGenerator>,

    /// Location name lookup
    pub locations: LocationNames,

    /// Cached bus listings
    pub buses: Arc<BusDirectory>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        store: InMemoryRouteStore,
        validator: RouteValidator,
        route_numbers: RouteNumberGenerator,
        locations: LocationNames,
        buses: BusDirectory,
    ) -> Self {
        Self {
            store: Arc::new(store),
            validator: Arc::new(validator),
            route_numbers: Arc::new(route_numbers),
            locations,
            buses: Arc::new(buses),
        }
    }
}
