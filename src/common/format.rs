use geo::Point;

/// Render a lon/lat point the way the coordinate readout shows it: `121.560000°, 25.040000°`.
pub fn format_lon_lat(point: Point<f64>) -> String {
    format!("{:.6}°, {:.6}°", point.x(), point.y())
}
