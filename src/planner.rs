//! Ordering and distance pipeline for one route.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::distance::{
    AnnotatedLocation, DistanceMode, annotate_depot, compute_distances, without_distances,
};
use crate::error::Result;
use crate::haversine::Haversine;
use crate::model::Location;
use crate::power::today;
use crate::ranking::{CustomRanks, apply_custom_sort};
use crate::sorting::sort_by_power;
use crate::traits::DistanceMetric;

#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Date the power schedule is evaluated for.
    pub date: NaiveDate,
    /// Forced distance mode. `None` walks the route only when the stops
    /// were put in custom order.
    pub mode: Option<DistanceMode>,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            date: today(),
            mode: None,
        }
    }
}

impl PlanOptions {
    pub fn for_date(date: NaiveDate) -> Self {
        Self { date, mode: None }
    }

    pub fn with_mode(mut self, mode: DistanceMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Ordered and measured stops of a route.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    pub depot: AnnotatedLocation,
    pub stops: Vec<AnnotatedLocation>,
    pub mode: DistanceMode,
    /// True when the order came from custom ranks.
    pub custom_order: bool,
    /// Route length in sequential mode, farthest stop in radial mode.
    pub total_km: Option<f64>,
}

/// Orders `locations` and measures them from `depot` with haversine distance.
pub fn plan_route(
    depot: &Location,
    locations: &[Location],
    ranks: &CustomRanks,
    options: &PlanOptions,
) -> Result<RoutePlan> {
    plan_route_with(depot, locations, ranks, options, &Haversine)
}

/// [`plan_route`] with a caller-supplied metric.
///
/// Custom ranks take precedence over the power-schedule order. A duplicate
/// rank fails the whole plan. Ranks held by ids outside `locations` are
/// ignored for both the order and the distance mode.
pub fn plan_route_with<M>(
    depot: &Location,
    locations: &[Location],
    ranks: &CustomRanks,
    options: &PlanOptions,
    metric: &M,
) -> Result<RoutePlan>
where
    M: DistanceMetric + Sync,
{
    let (ordered, custom_order) = match apply_custom_sort(locations, ranks)? {
        Some(ordered) => (ordered, true),
        None => (sort_by_power(locations, options.date), false),
    };

    let mode = options.mode.unwrap_or(if custom_order {
        DistanceMode::Sequential
    } else {
        DistanceMode::Radial
    });
    debug!(?mode, custom_order, "resolved stop order");

    let stops = match depot.coordinates() {
        Some(origin) => compute_distances(origin, &ordered, mode, metric),
        None => {
            debug!(depot = depot.id, "depot has no coordinates, skipping distances");
            without_distances(&ordered)
        }
    };

    let total_km = total_distance(&stops, mode);
    info!(stops = stops.len(), ?total_km, "planned route");

    Ok(RoutePlan {
        depot: annotate_depot(depot),
        stops,
        mode,
        custom_order,
        total_km,
    })
}

fn total_distance(stops: &[AnnotatedLocation], mode: DistanceMode) -> Option<f64> {
    let measured = stops.iter().filter_map(|stop| stop.kilometer);
    match mode {
        DistanceMode::Sequential => measured.last(),
        DistanceMode::Radial => measured.reduce(f64::max),
    }
}
