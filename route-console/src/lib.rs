//! Bus route console server.
//!
//! Operators build a route (departure, stops, arrival), price every forward
//! segment between waypoints, pick a schedule and a bus, and submit. The
//! server validates the whole form in one pass and stores the normalized
//! route.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod route;
pub mod store;
pub mod submit;
pub mod web;
