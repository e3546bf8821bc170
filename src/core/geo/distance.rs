//! Great-circle distance math
//!
//! Haversine distance between WGS84 points and route-total accumulation.
//! Pure functions: always a finite, non-negative result for valid input.

use super::point::GeoPoint;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lng = (b.longitude() - a.longitude()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two points in meters
pub fn haversine_m(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine_km(a, b) * 1000.0
}

/// Total distance along a chronologically ordered point sequence, in
/// kilometers
///
/// Sums the haversine distance between every consecutive pair. Sequences
/// shorter than two points have no travel and yield 0.
pub fn route_distance_km(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_km(&pair[0], &pair[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    #[test]
    fn test_haversine_zero_at_identity() {
        let a = p(4.6097, -74.0817);
        assert_eq!(haversine_km(&a, &a), 0.0);
    }

    #[test]
    fn test_haversine_symmetry() {
        let a = p(40.7128, -74.0060);
        let b = p(51.5074, -0.1278);
        let forward = haversine_km(&a, &b);
        let backward = haversine_km(&b, &a);
        assert!((forward - backward).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_known_distance() {
        // New York to London, roughly 5570 km
        let nyc = p(40.7128, -74.0060);
        let london = p(51.5074, -0.1278);
        let d = haversine_km(&nyc, &london);
        assert!((d - 5570.0).abs() < 10.0, "got {}", d);
    }

    #[test]
    fn test_haversine_small_displacement_in_meters() {
        // ~1.5 m displacement near the equator
        let a = p(10.0, 20.0);
        let b = p(10.00001, 20.00001);
        let d = haversine_m(&a, &b);
        assert!(d > 1.0 && d < 2.0, "got {}", d);
    }

    #[test]
    fn test_route_distance_degenerate_sequences() {
        assert_eq!(route_distance_km(&[]), 0.0);
        assert_eq!(route_distance_km(&[p(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn test_route_distance_is_pairwise_sum() {
        let a = p(10.0, 20.0);
        let b = p(10.1, 20.1);
        let c = p(10.2, 20.0);
        let total = route_distance_km(&[a, b, c]);
        let expected = haversine_km(&a, &b) + haversine_km(&b, &c);
        assert!((total - expected).abs() < 1e-12);
    }

    #[test]
    fn test_route_distance_non_negative() {
        let route = [p(-33.9, 18.4), p(-33.9, 18.4), p(-34.0, 18.5)];
        assert!(route_distance_km(&route) >= 0.0);
    }
}
