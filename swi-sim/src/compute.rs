//! Per-asset recomputation of derived fields.
//!
//! Each function updates one asset in place. Non-finite numbers, in the
//! inputs or the results, are unexpected and returned as errors.

use swi_core::{AssetKind, CatchmentArea, Manhole, Pipeline};
use swi_geometry::{metric_area, metric_length, UtmZone};
use swi_hydraulics::{manhole_level, manning_n, pipe_hydraulics, rational_peak_flow};

fn ensure_finite(kind: AssetKind, id: i64, fields: &[(&str, f64)]) -> anyhow::Result<()> {
    for (name, value) in fields {
        if !value.is_finite() {
            anyhow::bail!("{} {} has a non-finite {} ({})", kind, id, name, value);
        }
    }
    Ok(())
}

pub fn simulate_catchment_area(area: &mut CatchmentArea, zone: &UtmZone) -> anyhow::Result<()> {
    ensure_finite(
        AssetKind::CatchmentArea,
        area.id,
        &[
            ("runoff_coefficient", area.runoff_coefficient),
            ("rainfall_intensity", area.rainfall_intensity),
        ],
    )?;
    let area_sq_m = match &area.geom {
        Some(geom) => metric_area(geom, zone),
        None => {
            log::warn!("[SWI] sim: catchment area {} has no geometry; area is 0", area.id);
            0.0
        }
    };
    let peak_flow = rational_peak_flow(area.runoff_coefficient, area.rainfall_intensity, area_sq_m);
    ensure_finite(
        AssetKind::CatchmentArea,
        area.id,
        &[("calculated_area_sq_m", area_sq_m), ("calculated_peak_flow", peak_flow)],
    )?;
    area.calculated_area_sq_m = Some(area_sq_m);
    area.calculated_peak_flow = Some(peak_flow);
    Ok(())
}

pub fn simulate_pipeline(pipeline: &mut Pipeline, zone: &UtmZone) -> anyhow::Result<()> {
    ensure_finite(
        AssetKind::Pipeline,
        pipeline.id,
        &[
            ("diameter", pipeline.diameter),
            ("slope", pipeline.slope),
            ("design_flow", pipeline.design_flow),
        ],
    )?;
    let length = match &pipeline.geom {
        Some(geom) => metric_length(geom, zone),
        None => {
            log::warn!("[SWI] sim: pipeline {} has no geometry; length is 0", pipeline.id);
            0.0
        }
    };
    let n = manning_n(pipeline.material_kind());
    let h = pipe_hydraulics(pipeline.diameter, pipeline.slope, n, pipeline.design_flow);
    log::debug!(
        "[SWI] sim: pipeline {} q_full={:.4} depth={:.3} velocity={:.3}",
        pipeline.id,
        h.full_capacity,
        h.depth,
        h.velocity
    );
    ensure_finite(
        AssetKind::Pipeline,
        pipeline.id,
        &[
            ("calculated_length_m", length),
            ("calculated_flow", h.calculated_flow),
            ("full_capacity_ratio", h.fill_ratio),
        ],
    )?;
    pipeline.calculated_length_m = Some(length);
    pipeline.calculated_flow = Some(h.calculated_flow);
    pipeline.full_capacity_ratio = Some(h.fill_ratio);
    Ok(())
}

pub fn simulate_manhole(manhole: &mut Manhole) -> anyhow::Result<()> {
    ensure_finite(
        AssetKind::Manhole,
        manhole.id,
        &[
            ("top_elevation", manhole.top_elevation),
            ("bottom_elevation", manhole.bottom_elevation),
            ("overflow_elevation", manhole.overflow_elevation),
            ("design_flow_limit", manhole.design_flow_limit),
            ("inflow", manhole.inflow),
        ],
    )?;
    let level = manhole_level(
        manhole.bottom_elevation,
        manhole.overflow_elevation,
        manhole.top_elevation,
        manhole.design_flow_limit,
        manhole.inflow,
    );
    ensure_finite(
        AssetKind::Manhole,
        manhole.id,
        &[("calculated_water_level", level.water_level)],
    )?;
    manhole.calculated_water_level = Some(level.water_level);
    manhole.is_overflow = Some(level.is_overflow);
    Ok(())
}
