//! Segment fare matrix.
//!
//! A passenger may board at any waypoint and alight at any later one, so a
//! route with `n` intermediate stops needs a price for every forward pair
//! `(from, to)` with `from ∈ -1..n` and `to ∈ from+1..=n`. That is
//! `(n+1)(n+2)/2` fares. Operators fill the matrix in sparsely while
//! editing; this module generates the required key set and checks the
//! submitted entries against it.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::DomainError;

use super::waypoint::WaypointIndex;

/// A directed segment between two waypoints.
///
/// Ordering is by origin, then destination, matching the order in which
/// [`required_keys`] generates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FareKey {
    from: WaypointIndex,
    to: WaypointIndex,
}

impl FareKey {
    /// Build a key from raw indices.
    ///
    /// # Examples
    ///
    /// ```
    /// use route_console::route::FareKey;
    ///
    /// let key = FareKey::new(-1, 0).unwrap();
    /// assert_eq!(key.to_string(), "-1->0");
    ///
    /// // Travel must go forward
    /// assert!(FareKey::new(2, 1).is_err());
    /// assert!(FareKey::new(1, 1).is_err());
    /// // Nothing exists before the departure point
    /// assert!(FareKey::new(-2, 0).is_err());
    /// ```
    pub fn new(from: i32, to: i32) -> Result<Self, DomainError> {
        let from_idx =
            WaypointIndex::new(from).ok_or(DomainError::FareIndexBelowDeparture { from, to })?;
        if to <= from {
            return Err(DomainError::InvalidFareSegment { from, to });
        }
        Ok(Self {
            from: from_idx,
            to: WaypointIndex::new(to).ok_or(DomainError::InvalidFareSegment { from, to })?,
        })
    }

    fn between(from: WaypointIndex, to: WaypointIndex) -> Self {
        debug_assert!(from < to);
        Self { from, to }
    }

    pub fn from(&self) -> WaypointIndex {
        self.from
    }

    pub fn to(&self) -> WaypointIndex {
        self.to
    }

    /// Whether this key is the leg from stop `i` to the very next waypoint.
    fn is_stop_leg(&self) -> bool {
        self.from != WaypointIndex::DEPARTURE && self.to == self.from.next()
    }
}

impl fmt::Display for FareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// Number of fares a route with `stop_count` stops must carry.
pub fn required_fare_count(stop_count: usize) -> usize {
    (stop_count + 1) * (stop_count + 2) / 2
}

/// Every segment a route with `stop_count` intermediate stops must price.
///
/// Keys come out ordered by origin, then destination.
///
/// # Examples
///
/// ```
/// use route_console::route::required_keys;
///
/// let keys: Vec<String> = required_keys(1).iter().map(|k| k.to_string()).collect();
/// assert_eq!(keys, vec!["-1->0", "-1->1", "0->1"]);
/// ```
pub fn required_keys(stop_count: usize) -> Vec<FareKey> {
    let arrival = WaypointIndex::arrival(stop_count).get();
    let mut keys = Vec::with_capacity(required_fare_count(stop_count));
    for from in -1..arrival {
        for to in (from + 1)..=arrival {
            keys.push(FareKey::between(WaypointIndex(from), WaypointIndex(to)));
        }
    }
    keys
}

/// Why a submitted fare is not usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceIssue {
    /// No entry, or an empty one.
    Missing,
    /// The text does not parse as a finite number.
    NotANumber,
    /// Zero or negative.
    NotPositive,
}

/// A validated segment price: finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    /// Parse the text an operator typed into a fare cell.
    ///
    /// Blank input counts as missing, not as zero.
    pub fn parse(raw: &str) -> Result<Self, PriceIssue> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PriceIssue::Missing);
        }
        let value: f64 = trimmed.parse().map_err(|_| PriceIssue::NotANumber)?;
        Self::new(value)
    }

    pub fn new(value: f64) -> Result<Self, PriceIssue> {
        if !value.is_finite() {
            return Err(PriceIssue::NotANumber);
        }
        if value <= 0.0 {
            return Err(PriceIssue::NotPositive);
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Required segments that have no usable price.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} segment fare(s) missing or not positive", .missing.len())]
pub struct IncompleteFares {
    missing: Vec<FareKey>,
}

impl IncompleteFares {
    pub fn missing(&self) -> &[FareKey] {
        &self.missing
    }

    pub fn into_missing(self) -> Vec<FareKey> {
        self.missing
    }
}

/// A fare matrix that prices every required segment.
///
/// Only [`FareMatrix::complete`] builds one, so holding a value means every
/// leg price is present.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteFares {
    fares: Vec<(FareKey, Price)>,
    legs: Vec<Price>,
}

impl CompleteFares {
    /// All required fares in generation order.
    pub fn fares(&self) -> &[(FareKey, Price)] {
        &self.fares
    }

    /// `legs()[i]` is the fare from stop `i` to the next waypoint.
    pub fn legs(&self) -> &[Price] {
        &self.legs
    }
}

/// Sparse fares entered by the operator, keyed by segment.
///
/// Setting the same segment twice keeps only the latest value. Entries whose
/// indices fall outside the current route (e.g. after a stop was removed)
/// stay in the map but are never consulted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FareMatrix {
    entries: BTreeMap<FareKey, String>,
}

impl FareMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the raw price text for a segment, returning the previous text.
    pub fn set_fare(&mut self, key: FareKey, raw_price: impl Into<String>) -> Option<String> {
        self.entries.insert(key, raw_price.into())
    }

    pub fn remove_fare(&mut self, key: &FareKey) -> Option<String> {
        self.entries.remove(key)
    }

    /// The raw text stored for a segment.
    pub fn price_text(&self, key: &FareKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check a single segment.
    pub fn check_fare(&self, key: &FareKey) -> Result<Price, PriceIssue> {
        match self.entries.get(key) {
            Some(raw) => Price::parse(raw),
            None => Err(PriceIssue::Missing),
        }
    }

    /// Required segments for `stop_count` stops that lack a valid price.
    pub fn missing_keys(&self, stop_count: usize) -> Vec<FareKey> {
        required_keys(stop_count)
            .into_iter()
            .filter(|key| self.check_fare(key).is_err())
            .collect()
    }

    /// Whether every required segment has a valid price.
    pub fn is_complete(&self, stop_count: usize) -> bool {
        required_keys(stop_count)
            .iter()
            .all(|key| self.check_fare(key).is_ok())
    }

    /// Resolve every required segment, or report which are missing.
    pub fn complete(&self, stop_count: usize) -> Result<CompleteFares, IncompleteFares> {
        let keys = required_keys(stop_count);
        let mut fares = Vec::with_capacity(keys.len());
        let mut legs = Vec::with_capacity(stop_count);
        let mut missing = Vec::new();

        for key in keys {
            match self.check_fare(&key) {
                Ok(price) => {
                    if key.is_stop_leg() {
                        legs.push(price);
                    }
                    fares.push((key, price));
                }
                Err(_) => missing.push(key),
            }
        }

        if missing.is_empty() {
            Ok(CompleteFares { fares, legs })
        } else {
            Err(IncompleteFares { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(from: i32, to: i32) -> FareKey {
        FareKey::new(from, to).unwrap()
    }

    fn full_matrix(stop_count: usize, price: &str) -> FareMatrix {
        let mut m = FareMatrix::new();
        for k in required_keys(stop_count) {
            m.set_fare(k, price);
        }
        m
    }

    #[test]
    fn no_stops_requires_only_direct_fare() {
        assert_eq!(required_keys(0), vec![key(-1, 0)]);
        assert_eq!(required_fare_count(0), 1);
    }

    #[test]
    fn two_stops_key_order() {
        let keys: Vec<(i32, i32)> = required_keys(2)
            .iter()
            .map(|k| (k.from().get(), k.to().get()))
            .collect();
        assert_eq!(
            keys,
            vec![(-1, 0), (-1, 1), (-1, 2), (0, 1), (0, 2), (1, 2)]
        );
    }

    #[test]
    fn key_rejects_backward_and_self_segments() {
        assert_eq!(
            FareKey::new(0, 0),
            Err(DomainError::InvalidFareSegment { from: 0, to: 0 })
        );
        assert_eq!(
            FareKey::new(3, 1),
            Err(DomainError::InvalidFareSegment { from: 3, to: 1 })
        );
        assert_eq!(
            FareKey::new(-3, 0),
            Err(DomainError::FareIndexBelowDeparture { from: -3, to: 0 })
        );
    }

    #[test]
    fn price_parsing() {
        assert_eq!(Price::parse("10").unwrap().value(), 10.0);
        assert_eq!(Price::parse(" 12.50 ").unwrap().value(), 12.5);
        assert_eq!(Price::parse(""), Err(PriceIssue::Missing));
        assert_eq!(Price::parse("   "), Err(PriceIssue::Missing));
        assert_eq!(Price::parse("ten"), Err(PriceIssue::NotANumber));
        assert_eq!(Price::parse("NaN"), Err(PriceIssue::NotANumber));
        assert_eq!(Price::parse("inf"), Err(PriceIssue::NotANumber));
        assert_eq!(Price::parse("0"), Err(PriceIssue::NotPositive));
        assert_eq!(Price::parse("-5"), Err(PriceIssue::NotPositive));
    }

    #[test]
    fn last_write_wins() {
        let mut m = FareMatrix::new();
        assert_eq!(m.set_fare(key(-1, 0), "5"), None);
        assert_eq!(m.set_fare(key(-1, 0), "7"), Some("5".to_string()));
        assert_eq!(m.len(), 1);
        assert_eq!(m.price_text(&key(-1, 0)), Some("7"));
    }

    #[test]
    fn scenario_b_missing_stop_to_stop_fares() {
        let mut m = FareMatrix::new();
        m.set_fare(key(-1, 0), "10");
        m.set_fare(key(-1, 1), "20");
        m.set_fare(key(-1, 2), "30");

        assert!(!m.is_complete(2));
        assert_eq!(m.missing_keys(2), vec![key(0, 1), key(0, 2), key(1, 2)]);
    }

    #[test]
    fn scenario_c_zero_price_is_invalid() {
        let mut m = FareMatrix::new();
        m.set_fare(key(-1, 0), "10");
        m.set_fare(key(-1, 1), "0");
        m.set_fare(key(0, 1), "5");

        assert!(!m.is_complete(1));
        assert_eq!(m.missing_keys(1), vec![key(-1, 1)]);
    }

    #[test]
    fn empty_text_counts_as_missing() {
        let mut m = full_matrix(1, "4");
        m.set_fare(key(0, 1), "");
        assert_eq!(m.check_fare(&key(0, 1)), Err(PriceIssue::Missing));
        assert!(!m.is_complete(1));
    }

    #[test]
    fn extraneous_entries_are_ignored() {
        let mut m = full_matrix(0, "3");
        m.set_fare(key(0, 1), "9");
        m.set_fare(key(4, 7), "-1");
        assert!(m.is_complete(0));
        let complete = m.complete(0).unwrap();
        assert_eq!(complete.fares().len(), 1);
    }

    #[test]
    fn complete_collects_leg_prices_in_stop_order() {
        let mut m = full_matrix(2, "100");
        m.set_fare(key(0, 1), "11");
        m.set_fare(key(1, 2), "22");

        let complete = m.complete(2).unwrap();
        assert_eq!(complete.fares().len(), 6);
        let legs: Vec<f64> = complete.legs().iter().map(|p| p.value()).collect();
        assert_eq!(legs, vec![11.0, 22.0]);
    }

    #[test]
    fn complete_reports_every_gap() {
        let m = FareMatrix::new();
        let err = m.complete(1).unwrap_err();
        assert_eq!(err.missing(), &[key(-1, 0), key(-1, 1), key(0, 1)]);
        assert_eq!(err.to_string(), "3 segment fare(s) missing or not positive");
    }

    #[test]
    fn removing_a_stop_leaves_fares_keyed_on_old_indices() {
        // A two-stop matrix still satisfies the one-stop check once a stop is
        // removed: keys are not renumbered, so the old 0->1 price now stands
        // for a different segment.
        let m = full_matrix(2, "8");
        assert!(m.is_complete(1));
        assert_eq!(m.len(), 6);
    }
}
