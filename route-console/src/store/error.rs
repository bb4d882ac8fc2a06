//! Route store error types.

use super::RouteId;

/// Errors from the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No route with this id
    #[error("route {0} not found")]
    NotFound(RouteId),

    /// A route with this number already exists
    #[error("route number {0} is already in use")]
    DuplicateRouteNumber(String),

    /// Backend could not be reached or refused the write
    #[error("route store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(StoreError::NotFound(RouteId(9)).to_string(), "route 9 not found");
        assert_eq!(
            StoreError::DuplicateRouteNumber("RT-000001".into()).to_string(),
            "route number RT-000001 is already in use"
        );
    }
}
