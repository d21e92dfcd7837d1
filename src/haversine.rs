//! Great-circle distance between coordinates.
//!
//! Straight-line distance over the Earth's surface. Ignores roads, which is
//! what the dashboard reports as a stop's "kilometer".

use crate::model::Coordinates;
use crate::traits::DistanceMetric;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometers.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` past 1.0 for near-antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine-based [`DistanceMetric`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl DistanceMetric for Haversine {
    fn distance_km(&self, from: Coordinates, to: Coordinates) -> f64 {
        haversine_km(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let point = Coordinates::new(3.139, 101.6869);
        assert_eq!(haversine_km(point, point), 0.0);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = Coordinates::new(3.0738, 101.5183);
        let b = Coordinates::new(3.1478, 101.6953);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-12);
    }

    #[test]
    fn test_haversine_short_hop_in_kuala_lumpur() {
        // About 0.98 km north and 0.93 km east
        let from = Coordinates::new(3.1390, 101.6869);
        let dist = haversine_km(from, Coordinates::new(3.1478, 101.6953));
        assert!((dist - 1.35).abs() < 0.05, "expected ~1.35 km, got {}", dist);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Las Vegas to Los Angeles, ~370 km
        let las_vegas = Coordinates::new(36.17, -115.14);
        let dist = haversine_km(las_vegas, Coordinates::new(34.05, -118.24));
        assert!(dist > 350.0 && dist < 400.0, "LV to LA should be ~370km, got {}", dist);
    }

    #[test]
    fn test_haversine_across_antimeridian() {
        let dist = haversine_km(Coordinates::new(0.0, 179.5), Coordinates::new(0.0, -179.5));
        // One degree of longitude at the equator
        assert!((dist - 111.19).abs() < 0.1, "got {}", dist);
    }

    #[test]
    fn test_haversine_antipodal_points() {
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;

        let dist = haversine_km(Coordinates::new(87.5, 180.0), Coordinates::new(-87.5, 0.0));
        assert!((dist - half_circumference).abs() < 1e-6, "got {}", dist);

        for lat_tenths in -900..=900 {
            let lat = lat_tenths as f64 / 10.0;
            for lng in (-180..180).step_by(15) {
                let point = Coordinates::new(lat, lng as f64);
                let opposite = Coordinates::new(-lat, lng as f64 + 180.0);
                let dist = haversine_km(point, opposite);
                assert!(dist.is_finite() && dist >= 0.0, "({}, {}) gave {}", lat, lng, dist);
            }
        }
    }

    #[test]
    fn test_metric_matches_free_function() {
        let a = Coordinates::new(50.0755, 14.4378);
        let b = Coordinates::new(49.1951, 16.6068);
        assert_eq!(Haversine.distance_km(a, b), haversine_km(a, b));
    }
}
