//! Route construction and fare matrix validation.
//!
//! An operator builds a route as a departure, any number of intermediate
//! stops and an arrival, picks a cadence, assigns a bus and prices every
//! segment a passenger could ride. On submit, [`RouteValidator`] checks all
//! of it in one pass and either returns field-keyed messages or a normalized
//! [`RoutePayload`] for persistence.
//!
//! Everything here is synchronous and owns its data; nothing is shared
//! between submissions.

mod classification;
mod fare;
mod payload;
mod submission;
mod validator;
mod waypoint;

pub use classification::{ClassificationIssue, RouteClassification, RouteType};
pub use fare::{
    CompleteFares, FareKey, FareMatrix, IncompleteFares, Price, PriceIssue, required_fare_count,
    required_keys,
};
pub use payload::{ClassificationPayload, EndpointPayload, FarePayload, RoutePayload, StopPayload};
pub use submission::RouteSubmission;
pub use validator::{Field, RouteValidator, ValidationError, ValidationErrors, ValidatorConfig};
pub use waypoint::{TimingField, Waypoint, WaypointIndex, WaypointRole, WaypointSequence};
