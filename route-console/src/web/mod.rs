//! Web layer for the route console.
//!
//! Provides HTTP endpoints for building, validating and storing routes, plus
//! catalog lookups for the form.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
