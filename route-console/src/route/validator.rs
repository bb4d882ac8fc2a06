//! Submission validator.
//!
//! Runs every field check against a [`RouteSubmission`] in one pass, so the
//! operator sees all problems at once, and assembles the normalized
//! [`RoutePayload`] when nothing fails.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::domain::{BusRef, ClockTime, LocationRef};

use super::classification::{ClassificationIssue, RouteType};
use super::fare::{CompleteFares, FareKey};
use super::payload::{
    ClassificationPayload, EndpointPayload, FarePayload, RoutePayload, StopPayload,
};
use super::submission::RouteSubmission;
use super::waypoint::{TimingField, Waypoint};

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    RouteType,
    RouteDays,
    Bus,
    DepartureLocation,
    ArrivalLocation,
    DepartureTime,
    ArrivalTime,
    Stops,
    Fares,
}

impl Field {
    /// The form field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::RouteType => "route_type",
            Field::RouteDays => "route_days",
            Field::Bus => "bus",
            Field::DepartureLocation => "departure_location",
            Field::ArrivalLocation => "arrival_location",
            Field::DepartureTime => "departure_time",
            Field::ArrivalTime => "arrival_time",
            Field::Stops => "stops",
            Field::Fares => "fares",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-correctable problem with one field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required value is absent or blank
    #[error("{0} is required")]
    MissingField(String),

    /// Weekly route with no operating days
    #[error("select at least one operating day for a weekly route")]
    IncompleteSelection,

    /// Required segments without a positive price
    #[error("{} segment fare(s) missing or not positive: {}", .missing.len(), join_keys(.missing))]
    IncompleteFareMatrix { missing: Vec<FareKey> },

    /// A stop lacks one of its times
    #[error("stop {} is missing its {field}", .stop + 1)]
    IncompleteStopTiming { stop: usize, field: TimingField },

    /// A time that is not HH:MM (only with strict time checking)
    #[error("{label} \"{value}\" is not a valid HH:MM time: {reason}")]
    MalformedTime {
        label: String,
        value: String,
        reason: &'static str,
    },
}

fn join_keys(keys: &[FareKey]) -> String {
    keys.iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Field-keyed validation failures. Only the first failure per field is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("route submission has {} invalid field(s)", .errors.len())]
pub struct ValidationErrors {
    errors: BTreeMap<Field, ValidationError>,
}

impl ValidationErrors {
    fn record(&mut self, field: Field, error: ValidationError) {
        self.errors.entry(field).or_insert(error);
    }

    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.errors.get(&field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &ValidationError)> {
        self.errors.iter().map(|(f, e)| (*f, e))
    }

    /// Field name → message, for the form.
    pub fn messages(&self) -> BTreeMap<&'static str, String> {
        self.errors
            .iter()
            .map(|(f, e)| (f.as_str(), e.to_string()))
            .collect()
    }

    /// Segments reported as missing, if the fare matrix failed.
    pub fn missing_fares(&self) -> &[FareKey] {
        match self.errors.get(&Field::Fares) {
            Some(ValidationError::IncompleteFareMatrix { missing }) => missing,
            _ => &[],
        }
    }
}

/// Validator settings.
#[derive(Debug, Clone, Default)]
pub struct ValidatorConfig {
    /// Also require every time to be a well-formed "HH:MM".
    /// Off by default: times only need to be non-empty.
    pub strict_time_format: bool,
}

/// Checks submissions and builds payloads.
#[derive(Debug, Clone, Default)]
pub struct RouteValidator {
    config: ValidatorConfig,
}

/// A stop that passed its checks.
struct CheckedStop {
    location: LocationRef,
    arrival_time: String,
    departure_time: String,
}

impl RouteValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a submission.
    ///
    /// Every check runs regardless of earlier failures. Validation does not
    /// modify the submission, so repeating it gives the same answer.
    pub fn validate(&self, submission: &RouteSubmission) -> Result<RoutePayload, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let waypoints = submission.waypoints();

        let route_type = match submission.classification().check() {
            Ok(route_type) => Some(route_type),
            Err(ClassificationIssue::MissingType) => {
                errors.record(
                    Field::RouteType,
                    ValidationError::MissingField("route type".into()),
                );
                None
            }
            Err(ClassificationIssue::NoDaysSelected) => {
                errors.record(Field::RouteDays, ValidationError::IncompleteSelection);
                None
            }
        };

        let bus = submission.bus().cloned();
        if bus.is_none() {
            errors.record(Field::Bus, ValidationError::MissingField("bus".into()));
        }

        let departure_location = require_location(
            &mut errors,
            Field::DepartureLocation,
            "departure location",
            waypoints.departure().location(),
        );
        let arrival_location = require_location(
            &mut errors,
            Field::ArrivalLocation,
            "arrival location",
            waypoints.arrival().location(),
        );
        let departure_time = self.check_time(
            &mut errors,
            Field::DepartureTime,
            "departure time",
            waypoints.departure().departure_time(),
        );
        let arrival_time = self.check_time(
            &mut errors,
            Field::ArrivalTime,
            "arrival time",
            waypoints.arrival().arrival_time(),
        );

        let stops = self.check_stops(&mut errors, waypoints.stops());

        let fares = match submission.fares().complete(waypoints.stop_count()) {
            Ok(fares) => Some(fares),
            Err(incomplete) => {
                errors.record(
                    Field::Fares,
                    ValidationError::IncompleteFareMatrix {
                        missing: incomplete.into_missing(),
                    },
                );
                None
            }
        };

        match (
            route_type,
            bus,
            departure_location,
            arrival_location,
            departure_time,
            arrival_time,
            stops,
            fares,
        ) {
            (
                Some(route_type),
                Some(bus),
                Some(departure_location),
                Some(arrival_location),
                Some(departure_time),
                Some(arrival_time),
                Some(stops),
                Some(fares),
            ) if errors.is_empty() => Ok(assemble(
                submission,
                route_type,
                bus,
                EndpointPayload {
                    location: departure_location,
                    time: departure_time,
                },
                EndpointPayload {
                    location: arrival_location,
                    time: arrival_time,
                },
                stops,
                fares,
            )),
            _ => Err(errors),
        }
    }

    /// Non-empty check, plus HH:MM parsing when strict. Returns the trimmed value.
    fn check_time(
        &self,
        errors: &mut ValidationErrors,
        field: Field,
        label: &str,
        raw: &str,
    ) -> Option<String> {
        let value = raw.trim();
        if value.is_empty() {
            errors.record(field, ValidationError::MissingField(label.to_string()));
            return None;
        }
        if self.config.strict_time_format
            && let Err(e) = ClockTime::parse_hhmm(value)
        {
            errors.record(
                field,
                ValidationError::MalformedTime {
                    label: label.to_string(),
                    value: value.to_string(),
                    reason: e.reason(),
                },
            );
            return None;
        }
        Some(value.to_string())
    }

    fn check_stops(
        &self,
        errors: &mut ValidationErrors,
        stops: &[Waypoint],
    ) -> Option<Vec<CheckedStop>> {
        let mut checked = Vec::with_capacity(stops.len());
        let mut all_ok = true;

        for (i, stop) in stops.iter().enumerate() {
            let location = stop.location().cloned();
            if location.is_none() {
                errors.record(
                    Field::Stops,
                    ValidationError::MissingField(format!("stop {} location", i + 1)),
                );
            }

            let arrival_time = self.check_stop_time(errors, i, TimingField::ArrivalTime, stop);
            let departure_time = self.check_stop_time(errors, i, TimingField::DepartureTime, stop);

            match (location, arrival_time, departure_time) {
                (Some(location), Some(arrival_time), Some(departure_time)) => {
                    checked.push(CheckedStop {
                        location,
                        arrival_time,
                        departure_time,
                    });
                }
                _ => all_ok = false,
            }
        }

        all_ok.then_some(checked)
    }

    fn check_stop_time(
        &self,
        errors: &mut ValidationErrors,
        stop: usize,
        field: TimingField,
        waypoint: &Waypoint,
    ) -> Option<String> {
        let value = waypoint.timing(field).trim();
        if value.is_empty() {
            errors.record(
                Field::Stops,
                ValidationError::IncompleteStopTiming { stop, field },
            );
            return None;
        }
        if self.config.strict_time_format
            && let Err(e) = ClockTime::parse_hhmm(value)
        {
            errors.record(
                Field::Stops,
                ValidationError::MalformedTime {
                    label: format!("stop {} {}", stop + 1, field),
                    value: value.to_string(),
                    reason: e.reason(),
                },
            );
            return None;
        }
        Some(value.to_string())
    }
}

fn require_location(
    errors: &mut ValidationErrors,
    field: Field,
    label: &str,
    location: Option<&LocationRef>,
) -> Option<LocationRef> {
    if location.is_none() {
        errors.record(field, ValidationError::MissingField(label.to_string()));
    }
    location.cloned()
}

fn assemble(
    submission: &RouteSubmission,
    route_type: RouteType,
    bus: BusRef,
    departure: EndpointPayload,
    arrival: EndpointPayload,
    stops: Vec<CheckedStop>,
    fares: CompleteFares,
) -> RoutePayload {
    let stops = stops
        .into_iter()
        .zip(fares.legs())
        .map(|(stop, leg)| StopPayload {
            location: stop.location,
            arrival_time: stop.arrival_time,
            departure_time: stop.departure_time,
            price_usd: leg.value(),
        })
        .collect();

    let fares = fares
        .fares()
        .iter()
        .map(|(key, price)| FarePayload {
            from: key.from().get(),
            to: key.to().get(),
            price: price.value(),
        })
        .collect();

    RoutePayload {
        route_number: submission.route_number().clone(),
        bus,
        departure,
        arrival,
        stops,
        fares,
        classification: ClassificationPayload {
            route_type,
            days: submission.classification().operating_days(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteNumber, Weekday};
    use crate::route::required_keys;

    fn loc(s: &str) -> LocationRef {
        LocationRef::new(s.to_string()).unwrap()
    }

    fn key(from: i32, to: i32) -> FareKey {
        FareKey::new(from, to).unwrap()
    }

    /// Departure/arrival set, bus assigned, daily, no fares yet.
    fn base_submission() -> RouteSubmission {
        let mut s = RouteSubmission::new(RouteNumber::new("RT-000100".into()).unwrap());
        s.assign_bus(BusRef::new("bus-1".into()).unwrap());
        s.classification_mut().set_type(RouteType::Daily);
        let w = s.waypoints_mut();
        w.set_departure(loc("NBO"));
        w.set_departure_time("08:00");
        w.set_arrival(loc("MSA"));
        w.set_arrival_time("16:30");
        s
    }

    fn add_stop(s: &mut RouteSubmission, location: &str, arr: &str, dep: &str) {
        let w = s.waypoints_mut();
        let idx = w.append_stop(Some(loc(location))).get() as usize;
        w.set_stop_timing(idx, TimingField::ArrivalTime, arr).unwrap();
        w.set_stop_timing(idx, TimingField::DepartureTime, dep)
            .unwrap();
    }

    fn price_all(s: &mut RouteSubmission, price: &str) {
        let n = s.waypoints().stop_count();
        for k in required_keys(n) {
            s.fares_mut().set_fare(k, price);
        }
    }

    #[test]
    fn scenario_a_direct_route() {
        let mut s = base_submission();
        s.fares_mut().set_fare(key(-1, 0), "10");

        let payload = RouteValidator::default().validate(&s).unwrap();
        assert!(payload.stops.is_empty());
        assert_eq!(
            payload.fares,
            vec![FarePayload {
                from: -1,
                to: 0,
                price: 10.0
            }]
        );
        assert_eq!(payload.classification.route_type, RouteType::Daily);
        assert_eq!(payload.departure.location, loc("NBO"));
        assert_eq!(payload.arrival.time, "16:30");
        assert_eq!(payload.route_number.as_str(), "RT-000100");
    }

    #[test]
    fn scenario_b_missing_stop_fares() {
        let mut s = base_submission();
        add_stop(&mut s, "VOI", "12:00", "12:15");
        add_stop(&mut s, "MTW", "14:00", "14:10");
        s.fares_mut().set_fare(key(-1, 0), "10");
        s.fares_mut().set_fare(key(-1, 1), "20");
        s.fares_mut().set_fare(key(-1, 2), "30");

        let errors = RouteValidator::default().validate(&s).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.missing_fares(), &[key(0, 1), key(0, 2), key(1, 2)]);
        assert_eq!(
            errors.get(Field::Fares).map(|e| e.to_string()),
            Some("3 segment fare(s) missing or not positive: 0->1, 0->2, 1->2".to_string())
        );
    }

    #[test]
    fn scenario_c_zero_price() {
        let mut s = base_submission();
        add_stop(&mut s, "VOI", "12:00", "12:15");
        s.fares_mut().set_fare(key(-1, 0), "10");
        s.fares_mut().set_fare(key(-1, 1), "25");
        s.fares_mut().set_fare(key(0, 1), "0");

        let errors = RouteValidator::default().validate(&s).unwrap_err();
        assert!(matches!(
            errors.get(Field::Fares),
            Some(ValidationError::IncompleteFareMatrix { .. })
        ));
        assert_eq!(errors.missing_fares(), &[key(0, 1)]);
    }

    #[test]
    fn scenario_d_weekly_without_days() {
        let mut s = base_submission();
        s.classification_mut().set_type(RouteType::Weekly);
        price_all(&mut s, "10");

        let errors = RouteValidator::default().validate(&s).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(Field::RouteDays),
            Some(&ValidationError::IncompleteSelection)
        );

        // Independent of fare validity
        s.fares_mut().remove_fare(&key(-1, 0));
        let errors = RouteValidator::default().validate(&s).unwrap_err();
        assert!(errors.contains(Field::RouteDays));
        assert!(errors.contains(Field::Fares));
    }

    #[test]
    fn weekly_with_days_lists_them() {
        let mut s = base_submission();
        s.classification_mut().set_type(RouteType::Weekly);
        s.classification_mut().toggle_day(Weekday::Friday);
        s.classification_mut().toggle_day(Weekday::Monday);
        price_all(&mut s, "10");

        let payload = RouteValidator::default().validate(&s).unwrap();
        assert_eq!(payload.classification.route_type, RouteType::Weekly);
        assert_eq!(
            payload.classification.days,
            vec![Weekday::Monday, Weekday::Friday]
        );
    }

    #[test]
    fn daily_payload_drops_dormant_days() {
        let mut s = base_submission();
        s.classification_mut().toggle_day(Weekday::Sunday);
        price_all(&mut s, "10");

        let payload = RouteValidator::default().validate(&s).unwrap();
        assert!(payload.classification.days.is_empty());
    }

    #[test]
    fn empty_submission_reports_every_field() {
        let s = RouteSubmission::new(RouteNumber::new("RT-1".into()).unwrap());
        let errors = RouteValidator::default().validate(&s).unwrap_err();

        for field in [
            Field::RouteType,
            Field::Bus,
            Field::DepartureLocation,
            Field::ArrivalLocation,
            Field::DepartureTime,
            Field::ArrivalTime,
            Field::Fares,
        ] {
            assert!(errors.contains(field), "expected error on {field}");
        }
        assert!(!errors.contains(Field::RouteDays));
        assert!(!errors.contains(Field::Stops));
        assert_eq!(
            errors.get(Field::Bus).map(|e| e.to_string()),
            Some("bus is required".to_string())
        );
    }

    #[test]
    fn blank_times_count_as_missing() {
        let mut s = base_submission();
        s.waypoints_mut().set_departure_time("   ");
        price_all(&mut s, "10");

        let errors = RouteValidator::default().validate(&s).unwrap_err();
        assert_eq!(
            errors.get(Field::DepartureTime),
            Some(&ValidationError::MissingField("departure time".into()))
        );
    }

    #[test]
    fn stop_timing_first_failure_wins() {
        let mut s = base_submission();
        add_stop(&mut s, "VOI", "", "12:15");
        add_stop(&mut s, "MTW", "14:00", "");
        price_all(&mut s, "10");

        let errors = RouteValidator::default().validate(&s).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(Field::Stops),
            Some(&ValidationError::IncompleteStopTiming {
                stop: 0,
                field: TimingField::ArrivalTime
            })
        );
        assert_eq!(
            errors.messages().get("stops"),
            Some(&"stop 1 is missing its arrival time".to_string())
        );
    }

    #[test]
    fn stop_without_location_is_reported() {
        let mut s = base_submission();
        let idx = s.waypoints_mut().append_stop(None).get() as usize;
        s.waypoints_mut()
            .set_stop_timing(idx, TimingField::ArrivalTime, "10:00")
            .unwrap();
        s.waypoints_mut()
            .set_stop_timing(idx, TimingField::DepartureTime, "10:05")
            .unwrap();
        price_all(&mut s, "10");

        let errors = RouteValidator::default().validate(&s).unwrap_err();
        assert_eq!(
            errors.get(Field::Stops).map(|e| e.to_string()),
            Some("stop 1 location is required".to_string())
        );
    }

    #[test]
    fn stop_price_is_fare_to_next_waypoint() {
        let mut s = base_submission();
        add_stop(&mut s, "VOI", "12:00", "12:15");
        add_stop(&mut s, "MTW", "14:00", "14:10");
        price_all(&mut s, "50");
        s.fares_mut().set_fare(key(0, 1), "7.5");
        s.fares_mut().set_fare(key(1, 2), "9");

        let payload = RouteValidator::default().validate(&s).unwrap();
        assert_eq!(payload.stop_count(), 2);
        assert_eq!(payload.stops[0].price_usd, 7.5);
        assert_eq!(payload.stops[1].price_usd, 9.0);
        assert_eq!(payload.stops[1].location, loc("MTW"));
        assert_eq!(payload.fares.len(), 6);
    }

    #[test]
    fn validation_is_idempotent() {
        let mut s = base_submission();
        add_stop(&mut s, "VOI", "12:00", "");
        let validator = RouteValidator::default();
        assert_eq!(validator.validate(&s), validator.validate(&s));

        s.waypoints_mut()
            .set_stop_timing(0, TimingField::DepartureTime, "12:10")
            .unwrap();
        price_all(&mut s, "5");
        let first = validator.validate(&s).unwrap();
        let second = validator.validate(&s).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn lenient_mode_accepts_any_non_empty_time() {
        let mut s = base_submission();
        s.waypoints_mut().set_departure_time("8am");
        price_all(&mut s, "10");
        assert!(RouteValidator::default().validate(&s).is_ok());
    }

    #[test]
    fn strict_mode_rejects_malformed_times() {
        let mut s = base_submission();
        s.waypoints_mut().set_departure_time("8am");
        add_stop(&mut s, "VOI", "12:00", "25:00");
        price_all(&mut s, "10");

        let validator = RouteValidator::new(ValidatorConfig {
            strict_time_format: true,
        });
        let errors = validator.validate(&s).unwrap_err();
        assert_eq!(
            errors.get(Field::DepartureTime).map(|e| e.to_string()),
            Some("departure time \"8am\" is not a valid HH:MM time: expected HH:MM format".into())
        );
        assert_eq!(
            errors.get(Field::Stops).map(|e| e.to_string()),
            Some(
                "stop 1 departure time \"25:00\" is not a valid HH:MM time: hour must be 0-23"
                    .into()
            )
        );
    }

    #[test]
    fn orphaned_fares_after_stop_removal_are_not_in_payload() {
        let mut s = base_submission();
        add_stop(&mut s, "VOI", "12:00", "12:15");
        add_stop(&mut s, "MTW", "14:00", "14:10");
        price_all(&mut s, "10");
        s.waypoints_mut().remove_stop(1).unwrap();

        let payload = RouteValidator::default().validate(&s).unwrap();
        assert_eq!(payload.fares.len(), 3);
        assert!(payload.fares.iter().all(|f| f.to <= 1));
    }

    #[test]
    fn field_names() {
        assert_eq!(Field::DepartureLocation.as_str(), "departure_location");
        assert_eq!(
            serde_json::to_string(&Field::RouteDays).unwrap(),
            "\"route_days\""
        );
    }
}
