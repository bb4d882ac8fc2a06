//! Askama templates for the web frontend.

use askama::Template;

use crate::route::{RoutePayload, RouteType};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Console home page with the add-route form shell.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub route_number: String,
    pub location_count: usize,
    pub buses: Vec<BusOption>,
    /// Weekday tags for the day picker
    pub days: Vec<&'static str>,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
    pub details: Option<String>,
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Summary card for a stored route.
#[derive(Template)]
#[template(path = "route_summary.html")]
pub struct RouteSummaryTemplate {
    pub route: RouteSummaryView,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// An entry in the bus picker.
#[derive(Debug, Clone)]
pub struct BusOption {
    pub id: String,
    pub label: String,
}

/// Display names resolved for one stored route.
///
/// Locations are listed in waypoint order: departure, stops, arrival.
#[derive(Debug, Clone)]
pub struct ResolvedNames {
    pub bus: String,
    pub locations: Vec<String>,
}

/// One row of the timetable.
#[derive(Debug, Clone)]
pub struct WaypointRow {
    pub name: String,
    pub arrival: Option<String>,
    pub departure: Option<String>,
    /// Price to the next waypoint, formatted
    pub fare_to_next: Option<String>,
}

/// One priced segment.
#[derive(Debug, Clone)]
pub struct FareRow {
    pub from: String,
    pub to: String,
    pub price: String,
}

/// Route summary view model.
#[derive(Debug, Clone)]
pub struct RouteSummaryView {
    pub id: String,
    pub route_number: String,
    pub bus: String,
    pub schedule: String,
    pub created_at: String,
    pub rows: Vec<WaypointRow>,
    pub fares: Vec<FareRow>,
}

impl RouteSummaryView {
    /// Build from a stored payload and the names resolved for it.
    ///
    /// Missing names fall back to the raw location reference.
    pub fn new(
        id: String,
        created_at: String,
        payload: &RoutePayload,
        names: &ResolvedNames,
    ) -> Self {
        let name_at = |waypoint: i32| -> String {
            let slot = usize::try_from(waypoint + 1).ok();
            slot.and_then(|i| names.locations.get(i))
                .cloned()
                .unwrap_or_else(|| raw_location(payload, waypoint))
        };

        let mut rows = Vec::with_capacity(payload.stops.len() + 2);
        let first_leg = payload
            .fares
            .iter()
            .find(|f| f.from == -1 && f.to == 0)
            .map(|f| format_price(f.price));
        rows.push(WaypointRow {
            name: name_at(-1),
            arrival: None,
            departure: Some(payload.departure.time.clone()),
            fare_to_next: first_leg,
        });
        for (i, stop) in payload.stops.iter().enumerate() {
            rows.push(WaypointRow {
                name: name_at(i as i32),
                arrival: Some(stop.arrival_time.clone()),
                departure: Some(stop.departure_time.clone()),
                fare_to_next: Some(format_price(stop.price_usd)),
            });
        }
        rows.push(WaypointRow {
            name: name_at(payload.stops.len() as i32),
            arrival: Some(payload.arrival.time.clone()),
            departure: None,
            fare_to_next: None,
        });

        let fares = payload
            .fares
            .iter()
            .map(|f| FareRow {
                from: name_at(f.from),
                to: name_at(f.to),
                price: format_price(f.price),
            })
            .collect();

        let schedule = match payload.classification.route_type {
            RouteType::Daily => "Daily".to_string(),
            RouteType::Weekly => {
                let days: Vec<String> = payload
                    .classification
                    .days
                    .iter()
                    .map(|d| d.to_string())
                    .collect();
                format!("Weekly: {}", days.join(", "))
            }
        };

        Self {
            id,
            route_number: payload.route_number.to_string(),
            bus: names.bus.clone(),
            schedule,
            created_at,
            rows,
            fares,
        }
    }

    pub fn stop_count(&self) -> usize {
        self.rows.len().saturating_sub(2)
    }
}

/// Raw reference for a waypoint index, or "?" if out of range.
fn raw_location(payload: &RoutePayload, waypoint: i32) -> String {
    let stops = payload.stops.len() as i32;
    match waypoint {
        -1 => payload.departure.location.to_string(),
        i if i == stops => payload.arrival.location.to_string(),
        i => usize::try_from(i)
            .ok()
            .and_then(|i| payload.stops.get(i))
            .map(|s| s.location.to_string())
            .unwrap_or_else(|| "?".to_string()),
    }
}

fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BusRef, LocationRef, RouteNumber, Weekday};
    use crate::route::{ClassificationPayload, EndpointPayload, FarePayload, StopPayload};

    fn loc(s: &str) -> LocationRef {
        LocationRef::new(s.to_string()).unwrap()
    }

    fn payload(route_type: RouteType, days: Vec<Weekday>) -> RoutePayload {
        RoutePayload {
            route_number: RouteNumber::new("RT-000009".to_string()).unwrap(),
            bus: BusRef::new("bus-1".to_string()).unwrap(),
            departure: EndpointPayload {
                location: loc("nbo"),
                time: "08:00".to_string(),
            },
            arrival: EndpointPayload {
                location: loc("msa"),
                time: "16:00".to_string(),
            },
            stops: vec![StopPayload {
                location: loc("voi"),
                arrival_time: "12:00".to_string(),
                departure_time: "12:30".to_string(),
                price_usd: 15.0,
            }],
            fares: vec![
                FarePayload { from: -1, to: 0, price: 10.0 },
                FarePayload { from: -1, to: 1, price: 25.0 },
                FarePayload { from: 0, to: 1, price: 15.0 },
            ],
            classification: ClassificationPayload { route_type, days },
        }
    }

    #[test]
    fn rows_follow_waypoint_order() {
        let names = ResolvedNames {
            bus: "KDA 123A".to_string(),
            locations: vec!["Nairobi".into(), "Voi".into(), "Mombasa".into()],
        };
        let payload = payload(RouteType::Daily, vec![]);
        let view = RouteSummaryView::new("1".into(), "now".into(), &payload, &names);

        let names: Vec<&str> = view.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Nairobi", "Voi", "Mombasa"]);
        assert_eq!(view.rows[0].fare_to_next.as_deref(), Some("$10.00"));
        assert_eq!(view.rows[1].fare_to_next.as_deref(), Some("$15.00"));
        assert_eq!(view.rows[2].fare_to_next, None);
        assert_eq!(view.stop_count(), 1);
        assert_eq!(view.schedule, "Daily");
        assert_eq!(view.fares[1].from, "Nairobi");
        assert_eq!(view.fares[1].to, "Mombasa");
    }

    #[test]
    fn falls_back_to_raw_references() {
        let names = ResolvedNames {
            bus: "bus-1".to_string(),
            locations: vec![],
        };
        let view = RouteSummaryView::new(
            "1".into(),
            "now".into(),
            &payload(RouteType::Weekly, vec![Weekday::Monday, Weekday::Friday]),
            &names,
        );
        let names: Vec<&str> = view.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["nbo", "voi", "msa"]);
        assert!(view.schedule.starts_with("Weekly: "));
    }

    #[test]
    fn summary_renders() {
        let names = ResolvedNames {
            bus: "KDA 123A".to_string(),
            locations: vec!["Nairobi".into(), "Voi".into(), "Mombasa".into()],
        };
        let payload = payload(RouteType::Daily, vec![]);
        let html = RouteSummaryTemplate {
            route: RouteSummaryView::new("7".into(), "now".into(), &payload, &names),
        }
        .render()
        .unwrap();
        assert!(html.contains("RT-000009"));
        assert!(html.contains("KDA 123A"));
        assert!(html.contains("$25.00"));
    }
}
