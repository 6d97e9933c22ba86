//! Manhole water level and overflow.
//!
//! Two overflow criteria exist and are kept apart:
//!
//! - [`manhole_level`] interpolates a level between invert and overflow
//!   elevation from inflow versus the design flow limit. This is the one the
//!   simulation writes back.
//! - [`capacity_overflow`] compares inflow with the downstream capacity.

use serde::Serialize;

/// Level-based result for one manhole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ManholeLevel {
    pub water_level: f64,
    pub is_overflow: bool,
}

/// Water level from the inflow / design-limit ratio.
///
/// The ratio is not clamped, so an inflow above the design limit lifts the
/// level past the overflow elevation. The level is then capped at the top
/// elevation. A non-positive design limit leaves the level at the invert.
pub fn manhole_level(
    bottom_elevation: f64,
    overflow_elevation: f64,
    top_elevation: f64,
    design_flow_limit: f64,
    inflow: f64,
) -> ManholeLevel {
    let water_level = if design_flow_limit > 0.0 {
        let ratio = inflow / design_flow_limit;
        let level = bottom_elevation + ratio * (overflow_elevation - bottom_elevation);
        level.min(top_elevation)
    } else {
        bottom_elevation
    };
    ManholeLevel {
        water_level,
        is_overflow: water_level > overflow_elevation,
    }
}

/// Capacity-based result for one manhole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapacityOverflow {
    pub water_level: f64,
    pub is_overflow: bool,
}

/// Level rise per CMS of excess inflow once the downstream capacity is exceeded.
pub const EXCESS_RISE_PER_CMS: f64 = 0.1;

/// Overflow judged by inflow against downstream capacity.
///
/// Above capacity the level starts at the overflow elevation and rises
/// [`EXCESS_RISE_PER_CMS`] per unit of excess; below it the level is
/// interpolated between invert and overflow elevation.
pub fn capacity_overflow(
    invert_elevation: f64,
    overflow_elevation: f64,
    inflow: f64,
    downstream_capacity: f64,
) -> CapacityOverflow {
    if inflow > downstream_capacity {
        return CapacityOverflow {
            water_level: overflow_elevation + (inflow - downstream_capacity) * EXCESS_RISE_PER_CMS,
            is_overflow: true,
        };
    }
    let ratio = if downstream_capacity > 0.0 {
        inflow / downstream_capacity
    } else {
        0.0
    };
    CapacityOverflow {
        water_level: invert_elevation + (overflow_elevation - invert_elevation) * ratio,
        is_overflow: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surcharged_manhole_is_capped_at_top() {
        let result = manhole_level(-5.0, -0.5, 0.0, 0.1, 0.15);
        assert_eq!(result.water_level, 0.0);
        assert!(result.is_overflow);
    }

    #[test]
    fn level_interpolates_below_design_limit() {
        let result = manhole_level(-5.0, -0.5, 0.0, 0.1, 0.05);
        assert!((result.water_level - (-2.75)).abs() < 1e-12);
        assert!(!result.is_overflow);
    }

    #[test]
    fn zero_inflow_sits_at_invert() {
        let result = manhole_level(-5.0, -0.5, 0.0, 0.1, 0.0);
        assert_eq!(result.water_level, -5.0);
        assert!(!result.is_overflow);
    }

    #[test]
    fn zero_design_limit_sits_at_invert() {
        for &inflow in &[0.0, 0.3, 10.0] {
            let result = manhole_level(-3.0, -1.0, 0.5, 0.0, inflow);
            assert_eq!(result.water_level, -3.0);
            assert!(!result.is_overflow);
        }
    }

    #[test]
    fn level_is_monotonic_in_inflow_and_bounded_by_top() {
        let mut previous = f64::NEG_INFINITY;
        for step in 0..=100 {
            let inflow = step as f64 * 0.005;
            let result = manhole_level(-4.0, -1.0, 0.2, 0.2, inflow);
            assert!(result.water_level >= previous);
            assert!(result.water_level <= 0.2);
            previous = result.water_level;
        }
    }

    #[test]
    fn exactly_at_overflow_elevation_is_not_overflow() {
        let result = manhole_level(-5.0, -0.5, 0.0, 0.1, 0.1);
        assert!((result.water_level - (-0.5)).abs() < 1e-12);
        assert!(!result.is_overflow);
    }

    #[test]
    fn capacity_exceeded_overflows() {
        let result = capacity_overflow(-5.0, -0.5, 0.3, 0.1);
        assert!(result.is_overflow);
        assert!((result.water_level - (-0.48)).abs() < 1e-12);
    }

    #[test]
    fn capacity_not_exceeded_interpolates() {
        let result = capacity_overflow(-5.0, -0.5, 0.05, 0.1);
        assert!(!result.is_overflow);
        assert!((result.water_level - (-2.75)).abs() < 1e-12);
    }

    #[test]
    fn zero_capacity_with_zero_inflow_sits_at_invert() {
        let result = capacity_overflow(-5.0, -0.5, 0.0, 0.0);
        assert!(!result.is_overflow);
        assert_eq!(result.water_level, -5.0);
    }

    #[test]
    fn the_two_criteria_can_disagree() {
        // Inflow within the design limit but above the downstream capacity.
        let level = manhole_level(-5.0, -0.5, 0.0, 0.2, 0.1);
        let capacity = capacity_overflow(-5.0, -0.5, 0.1, 0.05);
        assert!(!level.is_overflow);
        assert!(capacity.is_overflow);
    }
}
