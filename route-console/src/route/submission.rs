//! In-progress route submission.

use crate::domain::{BusRef, RouteNumber};

use super::classification::RouteClassification;
use super::fare::FareMatrix;
use super::waypoint::WaypointSequence;

/// Everything an operator has entered on the add-route form.
///
/// Created empty when the form opens, edited field by field, then handed
/// once to [`RouteValidator::validate`](super::RouteValidator::validate).
/// The waypoint and fare collections belong to the submission alone.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSubmission {
    route_number: RouteNumber,
    bus: Option<BusRef>,
    waypoints: WaypointSequence,
    classification: RouteClassification,
    fares: FareMatrix,
}

impl RouteSubmission {
    /// Start an empty submission for an externally issued route number.
    pub fn new(route_number: RouteNumber) -> Self {
        Self {
            route_number,
            bus: None,
            waypoints: WaypointSequence::new(),
            classification: RouteClassification::new(),
            fares: FareMatrix::new(),
        }
    }

    pub fn route_number(&self) -> &RouteNumber {
        &self.route_number
    }

    pub fn bus(&self) -> Option<&BusRef> {
        self.bus.as_ref()
    }

    pub fn assign_bus(&mut self, bus: BusRef) {
        self.bus = Some(bus);
    }

    pub fn unassign_bus(&mut self) {
        self.bus = None;
    }

    pub fn waypoints(&self) -> &WaypointSequence {
        &self.waypoints
    }

    pub fn waypoints_mut(&mut self) -> &mut WaypointSequence {
        &mut self.waypoints
    }

    pub fn classification(&self) -> &RouteClassification {
        &self.classification
    }

    pub fn classification_mut(&mut self) -> &mut RouteClassification {
        &mut self.classification
    }

    pub fn fares(&self) -> &FareMatrix {
        &self.fares
    }

    pub fn fares_mut(&mut self) -> &mut FareMatrix {
        &mut self.fares
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{FareKey, RouteType};

    #[test]
    fn new_submission_is_blank() {
        let number = RouteNumber::new("RT-000001".into()).unwrap();
        let s = RouteSubmission::new(number.clone());
        assert_eq!(s.route_number(), &number);
        assert!(s.bus().is_none());
        assert_eq!(s.waypoints().stop_count(), 0);
        assert!(s.classification().route_type().is_none());
        assert!(s.fares().is_empty());
    }

    #[test]
    fn fields_are_edited_in_place() {
        let mut s = RouteSubmission::new(RouteNumber::new("RT-1".into()).unwrap());
        s.assign_bus(BusRef::new("bus-7".into()).unwrap());
        s.classification_mut().set_type(RouteType::Daily);
        s.waypoints_mut().append_stop(None);
        s.fares_mut().set_fare(FareKey::new(-1, 0).unwrap(), "12");

        assert_eq!(s.bus().map(|b| b.as_str()), Some("bus-7"));
        assert_eq!(s.classification().route_type(), Some(RouteType::Daily));
        assert_eq!(s.waypoints().stop_count(), 1);
        assert_eq!(s.fares().len(), 1);

        s.unassign_bus();
        assert!(s.bus().is_none());
    }
}
