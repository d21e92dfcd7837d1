//! delivery-planner
//!
//! Ordering and distance engine for delivery routes: natural route sorting,
//! power-schedule classification, custom visiting order, and haversine
//! distance annotation, plus a cached client for the dashboard API.

pub mod api;
pub mod cache;
pub mod config;
pub mod distance;
pub mod error;
pub mod haversine;
pub mod model;
pub mod planner;
pub mod power;
pub mod ranking;
pub mod sorting;
pub mod traits;

pub use error::{Error, Result};
