//! Test fixtures for delivery-planner.
//!
//! Provides:
//! - Kuala Lumpur / Shah Alam stops with approximate real coordinates
//! - a one-shot HTTP responder for exercising the API client

#![allow(dead_code)]

pub mod http;
pub mod kl_locations;

pub use kl_locations::*;
