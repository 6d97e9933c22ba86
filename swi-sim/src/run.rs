use anyhow::Context;
use std::fmt;
use swi_core::config::Config;
use swi_core::{AssetStore, Inventory};
use swi_geometry::UtmZone;

use crate::compute::{simulate_catchment_area, simulate_manhole, simulate_pipeline};

/// Where a simulation run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationPhase {
    Pending,
    Computing,
    Committed,
    RolledBack,
}

impl fmt::Display for SimulationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimulationPhase::Pending => "pending",
            SimulationPhase::Computing => "computing",
            SimulationPhase::Committed => "committed",
            SimulationPhase::RolledBack => "rolled_back",
        };
        write!(f, "{}", name)
    }
}

/// One simulation run against a store. A run can only be executed once.
pub struct Simulation<'a, S: AssetStore> {
    store: &'a S,
    zone: UtmZone,
    phase: SimulationPhase,
}

impl<'a, S: AssetStore> Simulation<'a, S> {
    pub fn new(store: &'a S, config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            store,
            zone: config.utm_zone()?,
            phase: SimulationPhase::Pending,
        })
    }

    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    fn enter(&mut self, phase: SimulationPhase) {
        log::info!("[SWI] sim: {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    /// Recompute every asset and commit the batch.
    ///
    /// Returns the refreshed inventory on commit. On any failure the store's
    /// transaction is not committed, the phase becomes `RolledBack`, and the
    /// error carries the cause.
    pub fn run(&mut self) -> anyhow::Result<Inventory> {
        if self.phase != SimulationPhase::Pending {
            anyhow::bail!("simulation already ran ({})", self.phase);
        }
        self.enter(SimulationPhase::Computing);
        match self.compute_and_commit() {
            Ok(inventory) => {
                self.enter(SimulationPhase::Committed);
                Ok(inventory)
            }
            Err(e) => {
                log::error!("[SWI] sim: run failed: {:#}", e);
                self.enter(SimulationPhase::RolledBack);
                Err(e.context("simulation rolled back"))
            }
        }
    }

    fn compute_and_commit(&self) -> anyhow::Result<Inventory> {
        let mut inventory = self
            .store
            .snapshot()
            .context("failed to read inventory")?;
        log::info!(
            "[SWI] sim: computing {} manholes, {} pipelines, {} catchment areas",
            inventory.manholes.len(),
            inventory.pipelines.len(),
            inventory.catchment_areas.len()
        );

        for area in &mut inventory.catchment_areas {
            simulate_catchment_area(area, &self.zone)?;
        }
        for pipeline in &mut inventory.pipelines {
            simulate_pipeline(pipeline, &self.zone)?;
        }
        for manhole in &mut inventory.manholes {
            simulate_manhole(manhole)?;
        }

        self.store
            .persist(&inventory)
            .context("failed to commit derived fields")?;
        Ok(inventory)
    }
}

/// Run one simulation over the whole inventory in `store`.
pub fn run_simulation<S: AssetStore>(store: &S, config: &Config) -> anyhow::Result<Inventory> {
    Simulation::new(store, config)?.run()
}
