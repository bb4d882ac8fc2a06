//! Domain types for the route console.
//!
//! This module contains the value types shared by the route builder, the
//! catalog lookups and the web layer. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod bus;
mod error;
mod location;
mod route_number;
mod time;
mod weekday;

pub use bus::{BusRef, InvalidBusRef};
pub use error::DomainError;
pub use location::{InvalidLocationRef, LocationRef};
pub use route_number::{InvalidRouteNumber, RouteNumber};
pub use time::{ClockTime, TimeError};
pub use weekday::{UnknownWeekday, Weekday};
