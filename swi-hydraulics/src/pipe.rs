//! Circular pipe capacity by Manning's equation.
//!
//! Full-bore capacity is exact for the given inputs. The partial-flow depth
//! is not: it comes from a coarse two-segment curve ([`PiecewiseDepthCurve`])
//! rather than from solving Manning's equation for depth. The curve sits
//! behind [`DepthCurve`] so a root-finding solver can replace it without
//! touching callers.

use serde::Serialize;
use std::f64::consts::PI;

/// Smallest flow depth used for the partial-flow geometry, in meters.
pub const MIN_FLOW_DEPTH: f64 = 0.01;

/// Maps a flow ratio (conveyed flow / full-bore capacity) to a flow depth.
pub trait DepthCurve {
    /// Flow depth in meters for a pipe of `diameter` running at `flow_ratio`
    /// of its full capacity. `flow_ratio` is in `[0, 1)`.
    fn depth(&self, diameter: f64, flow_ratio: f64) -> f64;
}

/// Two-segment approximation of depth versus flow ratio:
///
/// - `r <= 0.5`: `depth = D * sqrt(r) * 0.8`
/// - `r > 0.5`: `depth = D * (0.5 + (r - 0.5) * 0.8)`
///
/// The two segments do not meet at `r = 0.5`. Depth is floored at
/// [`MIN_FLOW_DEPTH`] and capped at the diameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PiecewiseDepthCurve;

impl DepthCurve for PiecewiseDepthCurve {
    fn depth(&self, diameter: f64, flow_ratio: f64) -> f64 {
        let r = flow_ratio.max(0.0);
        let depth = if r <= 0.5 {
            diameter * r.sqrt() * 0.8
        } else {
            diameter * (0.5 + (r - 0.5) * 0.8)
        };
        depth.max(MIN_FLOW_DEPTH).min(diameter)
    }
}

/// Hydraulic state of one pipe.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PipeHydraulics {
    /// Cross-section area running full, m^2.
    pub full_area: f64,
    /// Hydraulic radius running full (D/4), m.
    pub full_hydraulic_radius: f64,
    pub full_velocity: f64,
    /// Full-bore gravity capacity, CMS.
    pub full_capacity: f64,
    /// Conveyed flow. This is the design flow; nothing routes flow between assets.
    pub calculated_flow: f64,
    /// Percent of full-bore capacity used, 0 when the capacity is 0.
    pub fill_ratio: f64,
    /// Flow depth, m.
    pub depth: f64,
    /// Mean flow velocity, m/s.
    pub velocity: f64,
}

impl PipeHydraulics {
    pub fn is_degenerate(&self) -> bool {
        *self == PipeHydraulics::default()
    }

    pub fn is_surcharged(&self) -> bool {
        self.full_area > 0.0 && self.calculated_flow >= self.full_capacity
    }
}

fn manning_velocity(manning_n: f64, hydraulic_radius: f64, slope: f64) -> f64 {
    (1.0 / manning_n) * hydraulic_radius.powf(2.0 / 3.0) * slope.sqrt()
}

/// Pipe hydraulics using the default [`PiecewiseDepthCurve`].
pub fn pipe_hydraulics(diameter: f64, slope: f64, manning_n: f64, design_flow: f64) -> PipeHydraulics {
    pipe_hydraulics_with(&PiecewiseDepthCurve, diameter, slope, manning_n, design_flow)
}

/// Full-bore capacity, fill ratio and flow depth/velocity of a circular pipe.
///
/// A non-positive diameter, negative slope or non-positive roughness gives
/// the all-zero result instead of an error.
pub fn pipe_hydraulics_with<C: DepthCurve>(
    curve: &C,
    diameter: f64,
    slope: f64,
    manning_n: f64,
    design_flow: f64,
) -> PipeHydraulics {
    if !(diameter > 0.0) || !(slope >= 0.0) || !(manning_n > 0.0) {
        log::warn!(
            "[SWI] pipe: degenerate input D={} S={} n={}; all quantities are 0",
            diameter,
            slope,
            manning_n
        );
        return PipeHydraulics::default();
    }

    let radius = diameter / 2.0;
    let full_area = PI * radius * radius;
    let full_hydraulic_radius = diameter / 4.0;
    let full_velocity = manning_velocity(manning_n, full_hydraulic_radius, slope);
    let full_capacity = full_area * full_velocity;

    let calculated_flow = design_flow;
    let fill_ratio = if full_capacity > 0.0 {
        100.0 * calculated_flow / full_capacity
    } else {
        0.0
    };

    let (depth, velocity) = if full_capacity > 0.0 && calculated_flow < full_capacity {
        let depth = curve.depth(diameter, calculated_flow / full_capacity);
        let theta = 2.0 * (1.0 - 2.0 * depth / diameter).clamp(-1.0, 1.0).acos();
        let area = radius * radius / 2.0 * (theta - theta.sin());
        let perimeter = radius * theta;
        let hydraulic_radius = if perimeter > 0.0 { area / perimeter } else { 0.0 };
        (depth, manning_velocity(manning_n, hydraulic_radius, slope))
    } else {
        // Surcharged: full depth, velocity from continuity as pressure flow.
        (diameter, calculated_flow / full_area)
    };

    PipeHydraulics {
        full_area,
        full_hydraulic_radius,
        full_velocity,
        full_capacity,
        calculated_flow,
        fill_ratio,
        depth,
        velocity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concrete_half_meter_pipe() {
        let h = pipe_hydraulics(0.5, 0.001, 0.013, 0.05);
        assert!((h.full_area - 0.196_35).abs() < 1e-5);
        assert!((h.full_hydraulic_radius - 0.125).abs() < 1e-12);
        assert!((h.full_velocity - 0.6081).abs() < 1e-4, "v_full {}", h.full_velocity);
        assert!((h.full_capacity - 0.1194).abs() < 1e-4, "q_full {}", h.full_capacity);
        assert!((h.fill_ratio - 41.87).abs() < 0.01, "ratio {}", h.fill_ratio);
        assert_eq!(h.calculated_flow, 0.05);
    }

    #[test]
    fn partial_flow_uses_the_depth_curve() {
        let h = pipe_hydraulics(0.5, 0.001, 0.013, 0.05);
        let r = h.calculated_flow / h.full_capacity;
        assert!((h.depth - 0.5 * r.sqrt() * 0.8).abs() < 1e-12);
        assert!(h.depth < 0.5);
        // Just over half full, so slightly faster than running full.
        assert!(h.velocity > h.full_velocity && h.velocity < 0.65, "v {}", h.velocity);
    }

    #[test]
    fn non_positive_diameter_is_degenerate() {
        for &d in &[0.0, -0.3] {
            let h = pipe_hydraulics(d, 0.01, 0.013, 0.05);
            assert_eq!(h.full_capacity, 0.0);
            assert_eq!(h.fill_ratio, 0.0);
            assert!(h.is_degenerate());
        }
    }

    #[test]
    fn negative_slope_or_roughness_is_degenerate() {
        assert!(pipe_hydraulics(0.5, -0.001, 0.013, 0.05).is_degenerate());
        assert!(pipe_hydraulics(0.5, 0.001, 0.0, 0.05).is_degenerate());
        assert!(pipe_hydraulics(0.5, 0.001, -0.013, 0.05).is_degenerate());
        assert!(pipe_hydraulics(f64::NAN, 0.001, 0.013, 0.05).is_degenerate());
    }

    #[test]
    fn flat_pipe_has_no_gravity_capacity() {
        let h = pipe_hydraulics(0.5, 0.0, 0.013, 0.05);
        assert_eq!(h.full_capacity, 0.0);
        assert_eq!(h.fill_ratio, 0.0);
        assert_eq!(h.depth, 0.5);
        assert!((h.velocity - 0.05 / h.full_area).abs() < 1e-12);
        assert!(h.is_surcharged());
    }

    #[test]
    fn overloaded_pipe_runs_full_under_pressure() {
        let h = pipe_hydraulics(0.5, 0.001, 0.013, 0.2);
        assert!(h.fill_ratio > 100.0);
        assert_eq!(h.depth, 0.5);
        assert!((h.velocity - 0.2 / h.full_area).abs() < 1e-12);
        assert!(h.is_surcharged());
    }

    #[test]
    fn small_flows_hit_the_depth_floor() {
        let h = pipe_hydraulics(0.5, 0.01, 0.013, 1e-9);
        assert_eq!(h.depth, MIN_FLOW_DEPTH);
        assert!(h.velocity > 0.0);

        let negative = pipe_hydraulics(0.5, 0.01, 0.013, -0.1);
        assert_eq!(negative.depth, MIN_FLOW_DEPTH);
        assert_eq!(negative.fill_ratio, 100.0 * -0.1 / negative.full_capacity);
    }

    #[test]
    fn depth_never_exceeds_a_tiny_diameter() {
        let h = pipe_hydraulics(0.005, 0.05, 0.009, 1e-9);
        assert!(h.depth <= 0.005);
        assert!(h.velocity.is_finite());
    }

    #[test]
    fn piecewise_curve_segments() {
        let curve = PiecewiseDepthCurve;
        assert!((curve.depth(1.0, 0.25) - 0.4).abs() < 1e-12);
        assert!((curve.depth(1.0, 0.75) - 0.7).abs() < 1e-12);
        assert_eq!(curve.depth(1.0, 0.0), MIN_FLOW_DEPTH);
    }

    struct HalfFull;

    impl DepthCurve for HalfFull {
        fn depth(&self, diameter: f64, _flow_ratio: f64) -> f64 {
            diameter / 2.0
        }
    }

    #[test]
    fn depth_curve_can_be_swapped() {
        let h = pipe_hydraulics_with(&HalfFull, 0.6, 0.002, 0.013, 0.01);
        assert!((h.depth - 0.3).abs() < 1e-12);
        // Half full has the same hydraulic radius as full, so the same velocity.
        assert!((h.velocity - h.full_velocity).abs() < 1e-9);
    }
}
