//! Bus catalog reference type.

use std::fmt;

/// Error returned when constructing an invalid bus reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid bus reference: {reason}")]
pub struct InvalidBusRef {
    reason: &'static str,
}

/// Reference to a bus in an operator's fleet.
///
/// Buses live in the external bus catalog; a route only records which one
/// was assigned.
#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BusRef(String);

impl BusRef {
    /// Create a bus reference, rejecting blank identifiers.
    pub fn new(s: String) -> Result<Self, InvalidBusRef> {
        if s.trim().is_empty() {
            return Err(InvalidBusRef {
                reason: "bus reference cannot be blank",
            });
        }
        Ok(BusRef(s))
    }

    /// Returns the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BusRef {
    type Error = InvalidBusRef;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BusRef> for String {
    fn from(bus: BusRef) -> Self {
        bus.0
    }
}

impl fmt::Debug for BusRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BusRef({})", self.0)
    }
}

impl fmt::Display for BusRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
