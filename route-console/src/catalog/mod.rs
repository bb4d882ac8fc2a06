//! Location and bus catalog.
//!
//! The route builder only reads from the catalog: location names for search
//! and display, and the list of buses that can be assigned to a route.

mod client;
mod error;
mod names;
mod snapshot;

pub use client::{BusDto, CatalogClient, CatalogClientConfig, LocationDto};
pub use error::CatalogError;
pub use names::{LocationInfo, LocationMatch, LocationNames};
pub use snapshot::{LocationSnapshot, Snapshot, SnapshotConfig};
