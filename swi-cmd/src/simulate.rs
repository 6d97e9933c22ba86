//! Simulation and capacity-check commands.

use anyhow::Context;
use swi_core::config::Config;
use swi_db::Database;
use swi_sim::{capacity_check, run_simulation};

/// Run the simulation and emit the refreshed inventory as JSON.
///
/// On rollback nothing is written and the cause is returned.
pub fn run_simulate(db: &Database, config: &Config, output: Option<&str>) -> anyhow::Result<()> {
    let inventory = run_simulation(db, config)?;
    let json = serde_json::to_string_pretty(&inventory)?;
    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("failed to write {}", path))?;
            log::info!("Simulation complete. Output: {}", path);
        }
        None => println!("{}", json),
    }
    let overflowing = inventory
        .manholes
        .iter()
        .filter(|m| m.is_overflow == Some(true))
        .count();
    log::info!(
        "{} of {} manholes overflow",
        overflowing,
        inventory.manholes.len()
    );
    Ok(())
}

pub fn run_capacity_check(db: &Database) -> anyhow::Result<()> {
    let checks = capacity_check(db)?;
    println!("{}", serde_json::to_string_pretty(&checks)?);
    Ok(())
}
