//! Route operating cadence.

use std::collections::BTreeSet;
use std::fmt;

use crate::domain::Weekday;

/// How often a route runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteType {
    /// Every day of the week.
    Daily,
    /// Only on the selected weekdays.
    Weekly,
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteType::Daily => f.write_str("DAILY"),
            RouteType::Weekly => f.write_str("WEEKLY"),
        }
    }
}

/// Outcome of checking a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationIssue {
    /// No route type has been picked yet.
    MissingType,
    /// Weekly route with no operating days.
    NoDaysSelected,
}

/// Route type plus the weekday selection.
///
/// Switching from `WEEKLY` to `DAILY` keeps the selected days around so
/// switching back restores them. They are simply not consulted while the
/// route is daily.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteClassification {
    route_type: Option<RouteType>,
    days: BTreeSet<Weekday>,
}

impl RouteClassification {
    /// A classification with no type chosen and no days selected.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_type(&mut self, route_type: RouteType) {
        self.route_type = Some(route_type);
    }

    /// Flip a day in or out of the selection. Returns whether it is now selected.
    pub fn toggle_day(&mut self, day: Weekday) -> bool {
        if self.days.remove(&day) {
            false
        } else {
            self.days.insert(day);
            true
        }
    }

    pub fn route_type(&self) -> Option<RouteType> {
        self.route_type
    }

    /// Every selected day, including dormant ones on a daily route.
    pub fn days(&self) -> &BTreeSet<Weekday> {
        &self.days
    }

    /// Days that actually constrain the schedule: empty unless weekly.
    pub fn operating_days(&self) -> Vec<Weekday> {
        match self.route_type {
            Some(RouteType::Weekly) => self.days.iter().copied().collect(),
            _ => Vec::new(),
        }
    }

    /// Check the type is chosen and, for weekly routes, at least one day is selected.
    pub fn check(&self) -> Result<RouteType, ClassificationIssue> {
        match self.route_type {
            None => Err(ClassificationIssue::MissingType),
            Some(RouteType::Daily) => Ok(RouteType::Daily),
            Some(RouteType::Weekly) if self.days.is_empty() => {
                Err(ClassificationIssue::NoDaysSelected)
            }
            Some(RouteType::Weekly) => Ok(RouteType::Weekly),
        }
    }
}
