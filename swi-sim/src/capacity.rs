//! Capacity-based overflow report.
//!
//! Judges each manhole by inflow against its downstream capacity. This is a
//! read-only check; it does not touch the level-based fields the simulation
//! writes.

use serde::Serialize;
use swi_core::AssetStore;
use swi_hydraulics::capacity_overflow;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityCheck {
    pub id: i64,
    pub name: String,
    pub inflow: f64,
    pub downstream_capacity: f64,
    pub water_level: f64,
    pub is_overflow: bool,
}

pub fn capacity_check<S: AssetStore>(store: &S) -> anyhow::Result<Vec<CapacityCheck>> {
    let checks: Vec<CapacityCheck> = store
        .fetch_manholes()?
        .into_iter()
        .map(|m| {
            let result = capacity_overflow(
                m.bottom_elevation,
                m.overflow_elevation,
                m.inflow,
                m.downstream_capacity,
            );
            CapacityCheck {
                id: m.id,
                name: m.name,
                inflow: m.inflow,
                downstream_capacity: m.downstream_capacity,
                water_level: result.water_level,
                is_overflow: result.is_overflow,
            }
        })
        .collect();
    let overflowing = checks.iter().filter(|c| c.is_overflow).count();
    log::info!(
        "[SWI] capacity: {} of {} manholes exceed downstream capacity",
        overflowing,
        checks.len()
    );
    Ok(checks)
}
