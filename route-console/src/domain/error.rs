//! Domain error types.
//!
//! These errors represent programming mistakes when driving the route
//! builder (indices that do not exist, impossible fare segments). They are
//! distinct from user-facing validation messages.

/// Domain-level errors for route building.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Stop index is out of bounds for the waypoint sequence
    #[error("invalid stop index {index}: route has {len} stop(s)")]
    InvalidStopIndex { index: usize, len: usize },

    /// Fare segment does not travel forward
    #[error("invalid fare segment {from}->{to}: origin must come before destination")]
    InvalidFareSegment { from: i32, to: i32 },

    /// Fare segment starts before the departure point
    #[error("invalid fare segment {from}->{to}: index below departure")]
    FareIndexBelowDeparture { from: i32, to: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::InvalidStopIndex { index: 3, len: 2 };
        assert_eq!(err.to_string(), "invalid stop index 3: route has 2 stop(s)");

        let err = DomainError::InvalidFareSegment { from: 1, to: 1 };
        assert_eq!(
            err.to_string(),
            "invalid fare segment 1->1: origin must come before destination"
        );

        let err = DomainError::FareIndexBelowDeparture { from: -2, to: 0 };
        assert_eq!(
            err.to_string(),
            "invalid fare segment -2->0: index below departure"
        );
    }
}
