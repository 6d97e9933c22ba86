//! Geometry metrics for the stormwater inventory.
//!
//! Stored geometries are GeoJSON in geographic coordinates (WGS84
//! longitude/latitude). To get true ground measurements they are first
//! reprojected into a UTM zone and then measured in the plane:
//!
//! - [`projection`] converts between WGS84 and UTM, both directions.
//! - [`metrics`] computes path length and polygon area (shoelace, holes
//!   subtracted) of the projected geometry.

pub mod metrics;
pub mod projection;

pub use metrics::{measure, metric_area, metric_length, Measurement};
pub use projection::{Hemisphere, ProjectionError, UtmZone};
