//! Spatial query utilities for distance calculations.
//!
//! Uses Haversine formula for accurate distances on Earth's surface.

use geo::{HaversineDistance, Point};

/// Calculate Haversine distance between two points in meters
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    p1.haversine_distance(&p2)
}

/// Convert meters to degrees at equator (for bounding box queries)
pub fn meters_to_degrees_approx(meters: f64) -> f64 {
    meters / 111_320.0
}

/// Degree radius that covers `radius_m` around `point` in every direction.
///
/// A degree of longitude shrinks with latitude, so the radius is widened by
/// `1 / cos(lat)` to stay a superset of the true circle.
pub fn search_radius_degrees(point: Point, radius_m: f64) -> f64 {
    let cos_lat = point.y().to_radians().cos().abs().max(0.01);
    meters_to_degrees_approx(radius_m) / cos_lat
}
