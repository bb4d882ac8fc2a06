//! Normalized route payload handed to persistence.

use serde::{Deserialize, Serialize};

use crate::domain::{BusRef, LocationRef, RouteNumber, Weekday};

use super::classification::RouteType;

/// A validated route, ready to store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePayload {
    pub route_number: RouteNumber,
    pub bus: BusRef,
    pub departure: EndpointPayload,
    pub arrival: EndpointPayload,
    pub stops: Vec<StopPayload>,
    pub fares: Vec<FarePayload>,
    pub classification: ClassificationPayload,
}

/// Departure or arrival point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointPayload {
    pub location: LocationRef,
    /// "HH:MM" as entered
    pub time: String,
}

/// An intermediate stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopPayload {
    pub location: LocationRef,
    pub arrival_time: String,
    pub departure_time: String,
    /// Fare from this stop to the next waypoint
    pub price_usd: f64,
}

/// One priced segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarePayload {
    pub from: i32,
    pub to: i32,
    pub price: f64,
}

/// Operating cadence. `days` is empty for daily routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationPayload {
    pub route_type: RouteType,
    pub days: Vec<Weekday>,
}

impl RoutePayload {
    /// Number of intermediate stops.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }
}
