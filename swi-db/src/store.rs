//! [`AssetStore`] implementation: snapshot reads and the transactional
//! write-back of derived fields.

use rusqlite::params;
use swi_core::{AssetStore, CatchmentArea, Inventory, Manhole, Pipeline};

use crate::Database;

impl AssetStore for Database {
    fn fetch_manholes(&self) -> anyhow::Result<Vec<Manhole>> {
        self.query_manholes()
    }

    fn fetch_pipelines(&self) -> anyhow::Result<Vec<Pipeline>> {
        self.query_pipelines()
    }

    fn fetch_catchment_areas(&self) -> anyhow::Result<Vec<CatchmentArea>> {
        self.query_catchment_areas()
    }

    /// Write the derived fields of every asset in one transaction.
    ///
    /// Each update must hit exactly one row. If any does not (the asset was
    /// deleted since the snapshot) or any statement fails, the transaction is
    /// dropped uncommitted and no derived field changes.
    fn persist(&self, inventory: &Inventory) -> anyhow::Result<()> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "UPDATE manholes SET calculated_water_level = ?1, is_overflow = ?2 WHERE id = ?3",
            )?;
            for m in &inventory.manholes {
                let changed = stmt.execute(params![m.calculated_water_level, m.is_overflow, m.id])?;
                if changed != 1 {
                    anyhow::bail!("manhole {} no longer exists", m.id);
                }
            }

            let mut stmt = tx.prepare(
                "UPDATE pipelines SET calculated_length_m = ?1, calculated_flow = ?2,
                     full_capacity_ratio = ?3
                 WHERE id = ?4",
            )?;
            for p in &inventory.pipelines {
                let changed = stmt.execute(params![
                    p.calculated_length_m,
                    p.calculated_flow,
                    p.full_capacity_ratio,
                    p.id
                ])?;
                if changed != 1 {
                    anyhow::bail!("pipeline {} no longer exists", p.id);
                }
            }

            let mut stmt = tx.prepare(
                "UPDATE catchment_areas SET calculated_area_sq_m = ?1, calculated_peak_flow = ?2
                 WHERE id = ?3",
            )?;
            for c in &inventory.catchment_areas {
                let changed =
                    stmt.execute(params![c.calculated_area_sq_m, c.calculated_peak_flow, c.id])?;
                if changed != 1 {
                    anyhow::bail!("catchment area {} no longer exists", c.id);
                }
            }
        }
        tx.commit()?;
        log::info!(
            "[SWI] store: committed derived fields for {} assets",
            inventory.len()
        );
        Ok(())
    }
}
