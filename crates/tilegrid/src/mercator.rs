//! Spherical (Web) Mercator conversions between lon/lat degrees and meters.

use std::f64::consts::{FRAC_PI_2, PI};

use geo::{Coord, Point};

pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the projected world width in meters (the grid origin sits at `-HALF_WORLD, HALF_WORLD`).
pub const HALF_WORLD: f64 = PI * EARTH_RADIUS;

/// Latitude at which the projected square world ends.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

// Slack for round-off at the edge of the world.
const EDGE_EPSILON: f64 = 1e-6;

/// Project lon/lat degrees to Web Mercator meters. Latitudes beyond
/// `MAX_LATITUDE` and non-finite input have no projection.
pub fn project(lon_lat: Point<f64>) -> Option<Coord<f64>> {
    let (lon, lat) = (lon_lat.x(), lon_lat.y());
    if !(lon.is_finite() && lat.is_finite()) || lat.abs() > MAX_LATITUDE { return None }

    let x = EARTH_RADIUS * lon.to_radians();
    let y = EARTH_RADIUS * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
    Some(Coord { x, y })
}

/// Inverse projection from Web Mercator meters to lon/lat degrees.
/// Points outside the projected world square have no geographic position.
pub fn unproject(xy: Coord<f64>) -> Option<Point<f64>> {
    if !(xy.x.is_finite() && xy.y.is_finite()) { return None }
    if xy.x.abs() > HALF_WORLD + EDGE_EPSILON || xy.y.abs() > HALF_WORLD + EDGE_EPSILON {
        return None;
    }

    let lon = (xy.x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (xy.y / EARTH_RADIUS).exp().atan() - FRAC_PI_2).to_degrees();
    Some(Point::new(lon, lat))
}
