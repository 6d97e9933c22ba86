//! Hydraulic estimators for stormwater assets.
//!
//! Each estimator is a pure function of one asset's attributes; nothing here
//! looks at connectivity between assets.
//!
//! Flows are in CMS (cubic meters per second), lengths and elevations in
//! meters, rainfall intensity in mm/hr.

pub mod manhole;
pub mod pipe;
pub mod roughness;
pub mod runoff;

pub use manhole::{capacity_overflow, manhole_level, CapacityOverflow, ManholeLevel};
pub use pipe::{pipe_hydraulics, DepthCurve, PiecewiseDepthCurve, PipeHydraulics};
pub use roughness::manning_n;
pub use runoff::{rational_peak_flow, rational_peak_flow_hectares};
