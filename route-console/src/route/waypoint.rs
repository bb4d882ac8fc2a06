//! Waypoint sequence for a route under construction.
//!
//! A route is `[Departure, Stop_0 … Stop_{n-1}, Arrival]`. The departure and
//! arrival are single slots; intermediate stops can only be appended or
//! removed by index. Every other component addresses waypoints through the
//! [`WaypointIndex`] space, where the departure is `-1`, stop `i` is `i`
//! and the arrival is `n`.

use std::fmt;

use crate::domain::{DomainError, LocationRef};

/// Position of a waypoint in the fare index space.
///
/// # Examples
///
/// ```
/// use route_console::route::WaypointIndex;
///
/// assert_eq!(WaypointIndex::DEPARTURE.get(), -1);
/// assert_eq!(WaypointIndex::stop(2).get(), 2);
/// assert_eq!(WaypointIndex::arrival(3).get(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaypointIndex(pub(super) i32);

impl WaypointIndex {
    /// Index of the departure point.
    pub const DEPARTURE: WaypointIndex = WaypointIndex(-1);

    /// Wrap a raw index. Values below `-1` are not part of any route.
    pub fn new(raw: i32) -> Option<Self> {
        (raw >= -1).then_some(WaypointIndex(raw))
    }

    /// Index of intermediate stop `i`.
    pub fn stop(i: usize) -> Self {
        WaypointIndex(i as i32)
    }

    /// Index of the arrival point for a route with `stop_count` stops.
    pub fn arrival(stop_count: usize) -> Self {
        WaypointIndex(stop_count as i32)
    }

    /// The raw index value.
    pub fn get(self) -> i32 {
        self.0
    }

    /// The next waypoint in the direction of travel.
    pub fn next(self) -> Self {
        WaypointIndex(self.0 + 1)
    }
}

impl fmt::Display for WaypointIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a waypoint is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaypointRole {
    Departure,
    Stop,
    Arrival,
}

/// Which time field of a stop is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingField {
    ArrivalTime,
    DepartureTime,
}

impl fmt::Display for TimingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingField::ArrivalTime => f.write_str("arrival time"),
            TimingField::DepartureTime => f.write_str("departure time"),
        }
    }
}

/// A boarding or alighting point.
///
/// Times are kept exactly as the operator typed them; format checks happen
/// at submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waypoint {
    role: WaypointRole,
    location: Option<LocationRef>,
    arrival_time: String,
    departure_time: String,
}

impl Waypoint {
    fn empty(role: WaypointRole) -> Self {
        Self {
            role,
            location: None,
            arrival_time: String::new(),
            departure_time: String::new(),
        }
    }

    pub fn role(&self) -> WaypointRole {
        self.role
    }

    pub fn location(&self) -> Option<&LocationRef> {
        self.location.as_ref()
    }

    pub fn arrival_time(&self) -> &str {
        &self.arrival_time
    }

    pub fn departure_time(&self) -> &str {
        &self.departure_time
    }

    /// The raw value of a timing field.
    pub fn timing(&self, field: TimingField) -> &str {
        match field {
            TimingField::ArrivalTime => &self.arrival_time,
            TimingField::DepartureTime => &self.departure_time,
        }
    }

    fn set_timing(&mut self, field: TimingField, value: String) {
        match field {
            TimingField::ArrivalTime => self.arrival_time = value,
            TimingField::DepartureTime => self.departure_time = value,
        }
    }
}

/// Ordered waypoints of a route being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaypointSequence {
    departure: Waypoint,
    stops: Vec<Waypoint>,
    arrival: Waypoint,
}

impl Default for WaypointSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl WaypointSequence {
    /// An empty sequence: no locations chosen, no stops.
    pub fn new() -> Self {
        Self {
            departure: Waypoint::empty(WaypointRole::Departure),
            stops: Vec::new(),
            arrival: Waypoint::empty(WaypointRole::Arrival),
        }
    }

    /// Replace the departure location.
    pub fn set_departure(&mut self, location: LocationRef) {
        self.departure.location = Some(location);
    }

    /// Replace the arrival location.
    pub fn set_arrival(&mut self, location: LocationRef) {
        self.arrival.location = Some(location);
    }

    /// Set the time the bus leaves the departure point.
    pub fn set_departure_time(&mut self, value: impl Into<String>) {
        self.departure.departure_time = value.into();
    }

    /// Set the time the bus reaches the arrival point.
    pub fn set_arrival_time(&mut self, value: impl Into<String>) {
        self.arrival.arrival_time = value.into();
    }

    /// Append an intermediate stop and return its index.
    ///
    /// The location may be left unset while the operator is still editing.
    pub fn append_stop(&mut self, location: Option<LocationRef>) -> WaypointIndex {
        let index = WaypointIndex::stop(self.stops.len());
        let mut stop = Waypoint::empty(WaypointRole::Stop);
        stop.location = location;
        self.stops.push(stop);
        index
    }

    /// Remove the stop at `index`.
    ///
    /// Later stops shift down by one. Fare entries keyed on the old indices
    /// are left as they are; the operator re-enters fares for the new layout.
    pub fn remove_stop(&mut self, index: usize) -> Result<Waypoint, DomainError> {
        self.check_stop_index(index)?;
        Ok(self.stops.remove(index))
    }

    /// Set the location of an existing stop.
    pub fn set_stop_location(
        &mut self,
        index: usize,
        location: LocationRef,
    ) -> Result<(), DomainError> {
        self.check_stop_index(index)?;
        self.stops[index].location = Some(location);
        Ok(())
    }

    /// Store a raw timing value for a stop. No format check is done here.
    pub fn set_stop_timing(
        &mut self,
        index: usize,
        field: TimingField,
        value: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.check_stop_index(index)?;
        self.stops[index].set_timing(field, value.into());
        Ok(())
    }

    pub fn departure(&self) -> &Waypoint {
        &self.departure
    }

    pub fn arrival(&self) -> &Waypoint {
        &self.arrival
    }

    pub fn stops(&self) -> &[Waypoint] {
        &self.stops
    }

    /// Number of intermediate stops (`n`).
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Index of the arrival point for the current layout.
    pub fn arrival_index(&self) -> WaypointIndex {
        WaypointIndex::arrival(self.stops.len())
    }

    /// All waypoints in travel order, paired with their index.
    pub fn iter(&self) -> impl Iterator<Item = (WaypointIndex, &Waypoint)> {
        std::iter::once((WaypointIndex::DEPARTURE, &self.departure))
            .chain(
                self.stops
                    .iter()
                    .enumerate()
                    .map(|(i, stop)| (WaypointIndex::stop(i), stop)),
            )
            .chain(std::iter::once((self.arrival_index(), &self.arrival)))
    }

    /// Look up a waypoint by its index.
    pub fn get(&self, index: WaypointIndex) -> Option<&Waypoint> {
        match index.get() {
            -1 => Some(&self.departure),
            i if i as usize == self.stops.len() => Some(&self.arrival),
            i => self.stops.get(i as usize),
        }
    }

    fn check_stop_index(&self, index: usize) -> Result<(), DomainError> {
        if index >= self.stops.len() {
            return Err(DomainError::InvalidStopIndex {
                index,
                len: self.stops.len(),
            });
        }
        Ok(())
    }
}
