//! Route number type.

use std::fmt;

/// Error returned when constructing an invalid route number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route number: {reason}")]
pub struct InvalidRouteNumber {
    reason: &'static str,
}

/// A display-only route number.
///
/// Route numbers are generated outside the route builder and handed to the
/// form when it opens. Once a submission exists its route number never
/// changes.
///
/// # Examples
///
/// ```
/// use route_console::domain::RouteNumber;
///
/// let number = RouteNumber::new("RT-000042".to_string()).unwrap();
/// assert_eq!(number.as_str(), "RT-000042");
/// assert!(RouteNumber::new("".to_string()).is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RouteNumber(String);

impl RouteNumber {
    /// Create a route number. Surrounding whitespace is stripped.
    pub fn new(s: String) -> Result<Self, InvalidRouteNumber> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidRouteNumber {
                reason: "route number cannot be empty",
            });
        }
        if trimmed.len() == s.len() {
            Ok(RouteNumber(s))
        } else {
            Ok(RouteNumber(trimmed.to_string()))
        }
    }

    /// Build the `n`th number in a prefixed sequence, e.g. `RT-000042`.
    pub fn sequential(prefix: &str, n: u64) -> Self {
        if prefix.is_empty() {
            RouteNumber(format!("{n:06}"))
        } else {
            RouteNumber(format!("{prefix}-{n:06}"))
        }
    }

    /// Returns the route number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RouteNumber {
    type Error = InvalidRouteNumber;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RouteNumber> for String {
    fn from(number: RouteNumber) -> Self {
        number.0
    }
}

impl fmt::Debug for RouteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteNumber({})", self.0)
    }
}

impl fmt::Display for RouteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
