//! Pure spatial predicates used for distance accounting and geofence membership.
use geo::{Contains, LineString, Point, Polygon};

use crate::{Coordinate, Geofence, GeofenceShape};

/// Mean Earth radius.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in meters, using the haversine formula.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let delta_lat = lat_b - lat_a;
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// The boundary is inclusive.
pub fn is_inside_circle(point: Coordinate, center: Coordinate, radius_meters: f64) -> bool {
    distance_meters(point, center) <= radius_meters
}

/// Point-in-polygon over an implicitly closed ring.
///
/// Rings with fewer than three distinct vertices never contain anything, and points
/// exactly on an edge are considered outside.
pub fn is_inside_polygon(point: Coordinate, ring: &[Coordinate]) -> bool {
    if distinct_vertex_count(ring) < 3 {
        return false;
    }

    let exterior: LineString<f64> = ring
        .iter()
        .map(|c| (c.longitude, c.latitude))
        .collect::<Vec<_>>()
        .into();

    Polygon::new(exterior, vec![]).contains(&Point::from(point))
}

/// Membership of a point in a geofence, false for any fence whose shape cannot be
/// evaluated.
pub fn is_inside_geofence(point: Coordinate, geofence: &Geofence) -> bool {
    if geofence.shape.validate().is_err() {
        return false;
    }

    match &geofence.shape {
        GeofenceShape::Circle {
            center,
            radius_meters,
        } => is_inside_circle(point, *center, *radius_meters),
        GeofenceShape::Polygon { ring } => is_inside_polygon(point, ring),
    }
}

/// Number of vertices once an explicit closing vertex is disregarded.
pub fn distinct_vertex_count(ring: &[Coordinate]) -> usize {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 1 && first == last => ring.len() - 1,
        _ => ring.len(),
    }
}
