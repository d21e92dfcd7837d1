//! Seams between the ordering engine and its collaborators.
//!
//! The engine itself is plain functions over slices. These traits cover the
//! parts that vary: how distance is measured and where records come from.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Coordinates, Location, LocationId, Route, RouteId};

/// Measures the distance between two coordinates in kilometers.
///
/// Implementations must be non-negative and return 0 for equal points.
pub trait DistanceMetric {
    fn distance_km(&self, from: Coordinates, to: Coordinates) -> f64;
}

/// Outcome of saving a batch of routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSummary {
    pub created: usize,
    pub updated: usize,
}

/// Source and sink of route and location records.
pub trait RouteStore {
    /// All routes.
    fn routes(&self) -> Result<Vec<Route>>;

    /// Locations of one route, or every location when `route_id` is `None`.
    fn locations(&self, route_id: Option<RouteId>) -> Result<Vec<Location>>;

    /// Creates routes with temporary ids and updates the rest.
    fn save_routes(&self, routes: &[Route]) -> Result<SaveSummary>;

    fn save_locations(&self, locations: &[Location]) -> Result<()>;

    /// Creates a location and returns it with its assigned id.
    fn create_location(&self, location: &Location) -> Result<Location>;

    fn delete_location(&self, id: LocationId) -> Result<()>;

    fn delete_route(&self, id: RouteId) -> Result<()>;
}
