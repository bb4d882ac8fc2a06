//! Data transfer objects for web requests and responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{BusRef, DomainError, LocationRef, RouteNumber, Weekday};
use crate::route::{FareKey, RoutePayload, RouteSubmission, RouteType, TimingField};
use crate::store::RouteId;

/// Add-route form as posted by the console.
///
/// Every field except the route number may be missing or blank; the
/// validator reports what is still needed.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RouteSubmissionRequest {
    /// Route number handed out by `GET /routes/new`
    pub route_number: String,

    /// Assigned bus id
    pub bus: Option<String>,

    /// DAILY or WEEKLY
    pub route_type: Option<RouteType>,

    /// Days ticked in the weekday picker
    pub days: Vec<Weekday>,

    pub departure: EndpointRequest,

    pub arrival: EndpointRequest,

    /// Intermediate stops in travel order
    pub stops: Vec<StopRequest>,

    /// Segment fares keyed by waypoint index
    pub fares: Vec<FareRequest>,
}

/// Departure or arrival point as entered.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EndpointRequest {
    pub location: Option<String>,
    pub time: String,
}

/// An intermediate stop as entered.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StopRequest {
    pub location: Option<String>,
    pub arrival_time: String,
    pub departure_time: String,
}

/// One fare cell of the matrix.
#[derive(Debug, Deserialize)]
pub struct FareRequest {
    pub from: i32,
    pub to: i32,
    /// `null` or absent for a cell the operator left blank
    #[serde(default)]
    pub price: Option<PriceInput>,
}

/// Fare cells come from a text input, so accept either a JSON number or the
/// raw string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    fn into_raw(self) -> String {
        match self {
            PriceInput::Number(n) => n.to_string(),
            PriceInput::Text(s) => s,
        }
    }
}

/// Most intermediate stops a submitted route may have.
///
/// The fare matrix grows as (n+1)(n+2)/2, so this also bounds the number of
/// fares a request can require.
pub const MAX_STOPS: usize = 100;

/// Why a request body could not be turned into a submission.
///
/// These are client bugs, not operator mistakes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("invalid route number: {0}")]
    RouteNumber(String),

    #[error("route has {count} stops, at most {max} are allowed")]
    TooManyStops { count: usize, max: usize },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl RouteSubmissionRequest {
    /// Replay the form onto a fresh submission through the same operations
    /// the interactive builder uses.
    pub fn into_submission(self) -> Result<RouteSubmission, RequestError> {
        if self.stops.len() > MAX_STOPS {
            return Err(RequestError::TooManyStops {
                count: self.stops.len(),
                max: MAX_STOPS,
            });
        }

        let route_number = RouteNumber::new(self.route_number)
            .map_err(|e| RequestError::RouteNumber(e.to_string()))?;
        let mut submission = RouteSubmission::new(route_number);

        if let Some(bus) = self.bus.and_then(|b| BusRef::new(b).ok()) {
            submission.assign_bus(bus);
        }

        let classification = submission.classification_mut();
        if let Some(route_type) = self.route_type {
            classification.set_type(route_type);
        }
        let mut days = self.days;
        days.sort();
        days.dedup();
        for day in days {
            classification.toggle_day(day);
        }

        let waypoints = submission.waypoints_mut();
        if let Some(location) = LocationRef::from_form(self.departure.location) {
            waypoints.set_departure(location);
        }
        waypoints.set_departure_time(self.departure.time);
        if let Some(location) = LocationRef::from_form(self.arrival.location) {
            waypoints.set_arrival(location);
        }
        waypoints.set_arrival_time(self.arrival.time);

        for stop in self.stops {
            let index = waypoints.stop_count();
            waypoints.append_stop(LocationRef::from_form(stop.location));
            waypoints.set_stop_timing(index, TimingField::ArrivalTime, stop.arrival_time)?;
            waypoints.set_stop_timing(index, TimingField::DepartureTime, stop.departure_time)?;
        }

        let fares = submission.fares_mut();
        for fare in self.fares {
            let key = FareKey::new(fare.from, fare.to)?;
            fares.set_fare(key, fare.price.map(PriceInput::into_raw).unwrap_or_default());
        }

        Ok(submission)
    }
}

/// Response for a fresh add-route form.
#[derive(Debug, Serialize)]
pub struct NewRouteResponse {
    pub route_number: RouteNumber,
}

/// Response for `POST /routes/validate`.
#[derive(Debug, Serialize)]
pub struct ValidRouteResponse {
    pub route: RoutePayload,
}

/// Response for a stored route.
#[derive(Debug, Serialize)]
pub struct CreatedRouteResponse {
    pub id: RouteId,
    pub route_number: RouteNumber,
}

/// One row of `GET /routes`.
#[derive(Debug, Serialize)]
pub struct RouteListItem {
    pub id: RouteId,
    pub route_number: RouteNumber,
    pub stops: usize,
    pub created_at: String,
}

/// Response for `GET /routes`.
#[derive(Debug, Serialize)]
pub struct RouteListResponse {
    pub routes: Vec<RouteListItem>,
}

/// A stored route as returned by `GET /routes/:id`.
#[derive(Debug, Serialize)]
pub struct StoredRouteResponse {
    pub id: RouteId,
    pub created_at: String,
    pub route: RoutePayload,
}

/// Field errors for a rejected submission.
#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    /// Field name → first failing message
    pub errors: BTreeMap<&'static str, String>,

    /// Fare keys still needed, as "from->to"
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_fares: Vec<String>,
}

/// Query for location search.
#[derive(Debug, Deserialize)]
pub struct LocationSearchRequest {
    /// Search query
    #[serde(default)]
    pub q: String,

    /// Maximum number of results
    pub limit: Option<usize>,
}

/// A location in search results.
#[derive(Debug, Serialize)]
pub struct LocationSearchResult {
    pub id: String,
    pub name: String,
    pub city: String,
}

/// Response for location search.
#[derive(Debug, Serialize)]
pub struct LocationSearchResponse {
    pub locations: Vec<LocationSearchResult>,
}

/// Query for the bus list.
#[derive(Debug, Deserialize)]
pub struct BusListRequest {
    pub operator: Option<String>,
}

/// An assignable bus.
#[derive(Debug, Serialize)]
pub struct BusResult {
    pub id: String,
    pub plate_number: String,
    pub operator: String,
    pub seats: Option<u32>,
}

/// Response for the bus list.
#[derive(Debug, Serialize)]
pub struct BusListResponse {
    pub buses: Vec<BusResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
