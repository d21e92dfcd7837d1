//! Distance annotation of ordered stops.
//!
//! Two readings of "how far is this stop":
//! - radial: straight from the depot, independent of order;
//! - sequential: cumulative along the route, walking the stops in order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Coordinates, Location};
use crate::ranking::CustomRanks;
use crate::traits::DistanceMetric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMode {
    Radial,
    Sequential,
}

impl DistanceMode {
    /// Sequential once any of `locations` carries a custom rank, radial
    /// otherwise.
    pub fn infer(ranks: &CustomRanks, locations: &[Location]) -> Self {
        if ranks.is_active_for(locations) {
            DistanceMode::Sequential
        } else {
            DistanceMode::Radial
        }
    }
}

/// A location with its computed distances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedLocation {
    #[serde(flatten)]
    pub location: Location,
    /// Radial distance, or cumulative distance in sequential mode.
    pub kilometer: Option<f64>,
    /// Distance from the previous geolocated stop (or the depot).
    pub segment_distance: Option<f64>,
}

impl AnnotatedLocation {
    fn unmeasured(location: &Location) -> Self {
        Self {
            location: location.clone(),
            kilometer: None,
            segment_distance: None,
        }
    }
}

/// The depot annotated with its fixed zero distance.
pub fn annotate_depot(depot: &Location) -> AnnotatedLocation {
    AnnotatedLocation {
        location: depot.clone(),
        kilometer: Some(0.0),
        segment_distance: Some(0.0),
    }
}

/// Annotates `locations` with distances measured from `origin`.
///
/// Output has the same length and order as the input. Locations without
/// coordinates get `None` distances and, in sequential mode, do not advance
/// the walk.
pub fn compute_distances<M>(
    origin: Coordinates,
    locations: &[Location],
    mode: DistanceMode,
    metric: &M,
) -> Vec<AnnotatedLocation>
where
    M: DistanceMetric + Sync,
{
    debug!(?mode, stops = locations.len(), "computing distances");
    match mode {
        DistanceMode::Radial => radial(origin, locations, metric),
        DistanceMode::Sequential => sequential(origin, locations, metric),
    }
}

/// Annotates every location as unmeasured, for when no origin is known.
pub fn without_distances(locations: &[Location]) -> Vec<AnnotatedLocation> {
    locations.iter().map(AnnotatedLocation::unmeasured).collect()
}

fn radial<M>(origin: Coordinates, locations: &[Location], metric: &M) -> Vec<AnnotatedLocation>
where
    M: DistanceMetric + Sync,
{
    locations
        .par_iter()
        .map(|location| match location.coordinates() {
            Some(point) => {
                let km = metric.distance_km(origin, point);
                AnnotatedLocation {
                    location: location.clone(),
                    kilometer: Some(km),
                    segment_distance: Some(km),
                }
            }
            None => AnnotatedLocation::unmeasured(location),
        })
        .collect()
}

fn sequential<M>(origin: Coordinates, locations: &[Location], metric: &M) -> Vec<AnnotatedLocation>
where
    M: DistanceMetric,
{
    let mut cursor = origin;
    let mut cumulative = 0.0;

    locations
        .iter()
        .map(|location| match location.coordinates() {
            Some(point) => {
                let segment = metric.distance_km(cursor, point);
                cumulative += segment;
                cursor = point;
                AnnotatedLocation {
                    location: location.clone(),
                    kilometer: Some(cumulative),
                    segment_distance: Some(segment),
                }
            }
            None => AnnotatedLocation::unmeasured(location),
        })
        .collect()
}
