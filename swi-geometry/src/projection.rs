//! WGS84 <-> UTM transverse Mercator projection.
//!
//! Uses the Krüger series in the third flattening `n` (Karney 2011, to
//! order n^3), which is accurate to well under a millimeter inside a zone.

use geojson::{Geometry, Value};
use serde::Deserialize;
use std::fmt;

/// WGS84 semi-major axis in meters.
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

const K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    North,
    South,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ProjectionError {
    InvalidZone(u8),
    /// A position with fewer than two ordinates.
    ShortPosition(usize),
    OutOfRange { lon: f64, lat: f64 },
    NonFinite,
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionError::InvalidZone(zone) => {
                write!(f, "Projection error: UTM zone {} is not in 1..=60", zone)
            }
            ProjectionError::ShortPosition(len) => {
                write!(f, "Projection error: position has {} ordinates, need 2", len)
            }
            ProjectionError::OutOfRange { lon, lat } => {
                write!(f, "Projection error: ({}, {}) is not a valid lon/lat", lon, lat)
            }
            ProjectionError::NonFinite => write!(f, "Projection error: non-finite coordinate"),
        }
    }
}

impl std::error::Error for ProjectionError {}

/// A UTM zone on the WGS84 ellipsoid.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct UtmZone {
    number: u8,
    hemisphere: Hemisphere,
}

/// Series coefficients that depend only on the ellipsoid.
struct Series {
    /// Rectifying radius.
    a: f64,
    alpha: [f64; 3],
    beta: [f64; 3],
    delta: [f64; 3],
    /// 2 * sqrt(n) / (1 + n), used for conformal latitude.
    e_conf: f64,
}

fn series() -> Series {
    let n = WGS84_F / (2.0 - WGS84_F);
    let n2 = n * n;
    let n3 = n2 * n;
    Series {
        a: WGS84_A / (1.0 + n) * (1.0 + n2 / 4.0 + n2 * n2 / 64.0),
        alpha: [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0,
            61.0 * n3 / 240.0,
        ],
        beta: [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0,
            n2 / 48.0 + n3 / 15.0,
            17.0 * n3 / 480.0,
        ],
        delta: [
            2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3,
            7.0 * n2 / 3.0 - 8.0 * n3 / 5.0,
            56.0 * n3 / 15.0,
        ],
        e_conf: 2.0 * n.sqrt() / (1.0 + n),
    }
}

impl UtmZone {
    pub fn new(number: u8, hemisphere: Hemisphere) -> Result<Self, ProjectionError> {
        if !(1..=60).contains(&number) {
            return Err(ProjectionError::InvalidZone(number));
        }
        Ok(Self { number, hemisphere })
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    /// Longitude of the zone's central meridian in degrees.
    pub fn central_meridian(&self) -> f64 {
        f64::from(self.number) * 6.0 - 183.0
    }

    fn false_northing(&self) -> f64 {
        match self.hemisphere {
            Hemisphere::North => 0.0,
            Hemisphere::South => FALSE_NORTHING_SOUTH,
        }
    }

    /// Project a longitude/latitude pair (degrees) to easting/northing (meters).
    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(ProjectionError::NonFinite);
        }
        if lat.abs() >= 90.0 || lon.abs() > 180.0 {
            return Err(ProjectionError::OutOfRange { lon, lat });
        }
        let s = series();
        let phi = lat.to_radians();
        let dlambda = (lon - self.central_meridian()).to_radians();

        let t = (phi.sin().atanh() - s.e_conf * (s.e_conf * phi.sin()).atanh()).sinh();
        let xi_p = t.atan2(dlambda.cos());
        let eta_p = (dlambda.sin() / (1.0 + t * t).sqrt()).atanh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, alpha) in s.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += alpha * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += alpha * (k * xi_p).cos() * (k * eta_p).sinh();
        }

        let easting = FALSE_EASTING + K0 * s.a * eta;
        let northing = self.false_northing() + K0 * s.a * xi;
        if !easting.is_finite() || !northing.is_finite() {
            return Err(ProjectionError::OutOfRange { lon, lat });
        }
        Ok((easting, northing))
    }

    /// Inverse of [`UtmZone::forward`]: easting/northing back to lon/lat degrees.
    pub fn inverse(&self, easting: f64, northing: f64) -> Result<(f64, f64), ProjectionError> {
        if !easting.is_finite() || !northing.is_finite() {
            return Err(ProjectionError::NonFinite);
        }
        let s = series();
        let xi = (northing - self.false_northing()) / (K0 * s.a);
        let eta = (easting - FALSE_EASTING) / (K0 * s.a);

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, beta) in s.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_p -= beta * (k * xi).sin() * (k * eta).cosh();
            eta_p -= beta * (k * xi).cos() * (k * eta).sinh();
        }

        let chi = (xi_p.sin() / eta_p.cosh()).asin();
        let mut phi = chi;
        for (j, delta) in s.delta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            phi += delta * (k * chi).sin();
        }
        let lambda = eta_p.sinh().atan2(xi_p.cos());

        let lon = self.central_meridian() + lambda.to_degrees();
        let lat = phi.to_degrees();
        if !lon.is_finite() || !lat.is_finite() {
            return Err(ProjectionError::NonFinite);
        }
        Ok((lon, lat))
    }

    /// Reproject a WGS84 geometry into this zone.
    ///
    /// Points, line strings and polygons are converted vertex by vertex.
    /// Every other geometry kind is returned unchanged; callers must treat it
    /// as carrying no metric.
    pub fn to_metric(&self, geometry: &Geometry) -> Result<Geometry, ProjectionError> {
        self.map_geometry(geometry, |x, y| self.forward(x, y))
    }

    /// Reproject a geometry in this zone back to WGS84.
    pub fn to_geographic(&self, geometry: &Geometry) -> Result<Geometry, ProjectionError> {
        self.map_geometry(geometry, |x, y| self.inverse(x, y))
    }

    fn map_geometry<F>(&self, geometry: &Geometry, f: F) -> Result<Geometry, ProjectionError>
    where
        F: Fn(f64, f64) -> Result<(f64, f64), ProjectionError>,
    {
        let value = match &geometry.value {
            Value::Point(position) => Value::Point(map_position(position, &f)?),
            Value::LineString(line) => Value::LineString(map_ring(line, &f)?),
            Value::Polygon(rings) => Value::Polygon(
                rings
                    .iter()
                    .map(|ring| map_ring(ring, &f))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            _ => return Ok(geometry.clone()),
        };
        Ok(Geometry::new(value))
    }
}

fn map_position<F>(position: &[f64], f: &F) -> Result<Vec<f64>, ProjectionError>
where
    F: Fn(f64, f64) -> Result<(f64, f64), ProjectionError>,
{
    if position.len() < 2 {
        return Err(ProjectionError::ShortPosition(position.len()));
    }
    let (x, y) = f(position[0], position[1])?;
    let mut mapped = Vec::with_capacity(position.len());
    mapped.push(x);
    mapped.push(y);
    // Elevation and any further ordinates are carried through untouched.
    mapped.extend_from_slice(&position[2..]);
    Ok(mapped)
}

fn map_ring<F>(ring: &[Vec<f64>], f: &F) -> Result<Vec<Vec<f64>>, ProjectionError>
where
    F: Fn(f64, f64) -> Result<(f64, f64), ProjectionError>,
{
    ring.iter().map(|position| map_position(position, f)).collect()
}
