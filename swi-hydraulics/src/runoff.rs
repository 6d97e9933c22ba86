//! Peak runoff by the rational method.

/// Converts mm * m^2 / hr to m^3 / s.
const MM_M2_PER_HR_TO_CMS: f64 = 3_600_000.0;

fn valid_inputs(runoff_coefficient: f64, rainfall_intensity: f64, area: f64) -> bool {
    (0.0..=1.0).contains(&runoff_coefficient) && rainfall_intensity >= 0.0 && area >= 0.0
}

/// Peak flow in CMS: `Q = C * I * A / 3_600_000` with `A` in square meters.
///
/// An out-of-range coefficient, negative intensity or negative area is an
/// invalid configuration and yields 0. The result is never negative.
pub fn rational_peak_flow(runoff_coefficient: f64, rainfall_intensity: f64, area_sq_m: f64) -> f64 {
    if !valid_inputs(runoff_coefficient, rainfall_intensity, area_sq_m) {
        log::warn!(
            "[SWI] runoff: invalid configuration C={} I={} A={}; peak flow is 0",
            runoff_coefficient,
            rainfall_intensity,
            area_sq_m
        );
        return 0.0;
    }
    (runoff_coefficient * rainfall_intensity * area_sq_m / MM_M2_PER_HR_TO_CMS).max(0.0)
}

/// Same as [`rational_peak_flow`] in the hectare form `Q = C * I * A / 360`.
pub fn rational_peak_flow_hectares(
    runoff_coefficient: f64,
    rainfall_intensity: f64,
    area_ha: f64,
) -> f64 {
    if !valid_inputs(runoff_coefficient, rainfall_intensity, area_ha) {
        return 0.0;
    }
    ((1.0 / 360.0) * runoff_coefficient * rainfall_intensity * area_ha).max(0.0)
}
