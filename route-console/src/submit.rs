//! Route submission: validate, then persist once.

use tracing::{debug, info, warn};

use crate::domain::RouteNumber;
use crate::route::{RouteSubmission, RouteValidator, ValidationErrors};
use crate::store::{RouteId, RouteStore, StoreError};

/// Why a submission did not produce a stored route.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    /// The operator needs to fix the form
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// Validation passed but the store failed; the form may be resubmitted
    #[error("failed to save route: {0}")]
    Store(#[from] StoreError),
}

/// A route that was validated and stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRoute {
    pub id: RouteId,
    pub route_number: RouteNumber,
}

/// Validate `submission` and, if it passes, hand the payload to `store`.
///
/// The submission is consumed either way. On validation failure the store
/// is never called; on success it is called exactly once.
pub async fn submit_route<S: RouteStore>(
    store: &S,
    validator: &RouteValidator,
    submission: RouteSubmission,
) -> Result<CreatedRoute, SubmitError> {
    let payload = match validator.validate(&submission) {
        Ok(payload) => payload,
        Err(errors) => {
            debug!(
                route_number = %submission.route_number(),
                fields = errors.len(),
                "route submission rejected"
            );
            return Err(SubmitError::Invalid(errors));
        }
    };

    let route_number = payload.route_number.clone();
    match store.create_route(payload).await {
        Ok(id) => {
            info!(%id, %route_number, "route created");
            Ok(CreatedRoute { id, route_number })
        }
        Err(e) => {
            warn!(%route_number, error = %e, "route store rejected a valid submission");
            Err(SubmitError::Store(e))
        }
    }
}
