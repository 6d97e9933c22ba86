//! Planar length and area of reprojected geometries.

use geojson::{Geometry, Value};

use crate::projection::UtmZone;

/// What a geometry yields once measured in metric space.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Measurement {
    /// Points carry no metric.
    Point,
    /// Path length in meters.
    Length(f64),
    /// Area in square meters, holes subtracted.
    Area(f64),
    /// Geometry kind without a defined metric.
    Unavailable,
}

/// Reproject `geometry` into `zone` and measure it.
///
/// A failed reprojection is logged and yields a zero length or area for the
/// geometry's kind; it never aborts the caller.
pub fn measure(geometry: &Geometry, zone: &UtmZone) -> Measurement {
    let zero = match &geometry.value {
        Value::Point(_) => return Measurement::Point,
        Value::LineString(_) => Measurement::Length(0.0),
        Value::Polygon(_) => Measurement::Area(0.0),
        _ => return Measurement::Unavailable,
    };
    let projected = match zone.to_metric(geometry) {
        Ok(projected) => projected,
        Err(e) => {
            log::warn!("[SWI] metrics: {}; using zero measurement", e);
            return zero;
        }
    };
    match &projected.value {
        Value::LineString(line) => Measurement::Length(path_length(line)),
        Value::Polygon(rings) => Measurement::Area(polygon_area(rings)),
        _ => Measurement::Unavailable,
    }
}

/// Metric length of a path in meters, or 0 when the geometry is not a path.
pub fn metric_length(geometry: &Geometry, zone: &UtmZone) -> f64 {
    match measure(geometry, zone) {
        Measurement::Length(length) => length,
        other => {
            log::warn!("[SWI] metrics: expected a path, got {:?}; length is 0", other);
            0.0
        }
    }
}

/// Metric area of a polygon in square meters, or 0 when the geometry is not a polygon.
pub fn metric_area(geometry: &Geometry, zone: &UtmZone) -> f64 {
    match measure(geometry, zone) {
        Measurement::Area(area) => area,
        other => {
            log::warn!("[SWI] metrics: expected a polygon, got {:?}; area is 0", other);
            0.0
        }
    }
}

/// Sum of straight segment lengths along a path.
pub fn path_length(path: &[Vec<f64>]) -> f64 {
    path.windows(2)
        .map(|w| (w[1][0] - w[0][0]).hypot(w[1][1] - w[0][1]))
        .sum()
}

/// Signed shoelace area of a ring. Works for closed and open rings alike.
pub fn ring_signed_area(ring: &[Vec<f64>]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for (i, p) in ring.iter().enumerate() {
        let q = &ring[(i + 1) % ring.len()];
        twice_area += p[0] * q[1] - q[0] * p[1];
    }
    twice_area / 2.0
}

/// Exterior ring area minus the area of every interior ring.
pub fn polygon_area(rings: &[Vec<Vec<f64>>]) -> f64 {
    let mut rings = rings.iter();
    let exterior = match rings.next() {
        Some(ring) => ring_signed_area(ring).abs(),
        None => return 0.0,
    };
    let holes: f64 = rings.map(|ring| ring_signed_area(ring).abs()).sum();
    (exterior - holes).max(0.0)
}
