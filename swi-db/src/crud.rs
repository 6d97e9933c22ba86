//! Create, update and delete of assets.
//!
//! Updates only touch input attributes; derived columns keep their last
//! computed values until the next simulation run.

use anyhow::Context;
use geojson::Geometry;
use rusqlite::params;
use swi_core::{AssetKind, NewCatchmentArea, NewManhole, NewPipeline};

use crate::Database;

fn geometry_text(geom: &Option<Geometry>) -> anyhow::Result<Option<String>> {
    geom.as_ref()
        .map(|g| serde_json::to_string(g).context("failed to encode geometry"))
        .transpose()
}

impl Database {
    /// Insert a manhole and return its id.
    pub fn insert_manhole(&self, input: &NewManhole) -> anyhow::Result<i64> {
        let geom = geometry_text(&input.geom)?;
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT INTO manholes (name, geom, top_elevation, bottom_elevation, overflow_elevation,
                 design_flow_limit, inflow, downstream_capacity)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                input.name,
                geom,
                input.top_elevation,
                input.bottom_elevation,
                input.overflow_elevation,
                input.design_flow_limit,
                input.inflow,
                input.downstream_capacity
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert a pipeline and return its id.
    pub fn insert_pipeline(&self, input: &NewPipeline) -> anyhow::Result<i64> {
        let geom = geometry_text(&input.geom)?;
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT INTO pipelines (name, geom, diameter, slope, material, design_flow)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                input.name,
                geom,
                input.diameter,
                input.slope,
                input.material,
                input.design_flow
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert a catchment area and return its id.
    pub fn insert_catchment_area(&self, input: &NewCatchmentArea) -> anyhow::Result<i64> {
        let geom = geometry_text(&input.geom)?;
        let conn = self.conn.borrow();
        conn.execute(
            "INSERT INTO catchment_areas (name, geom, runoff_coefficient, rainfall_intensity)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                input.name,
                geom,
                input.runoff_coefficient,
                input.rainfall_intensity
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update_manhole(&self, id: i64, input: &NewManhole) -> anyhow::Result<()> {
        let geom = geometry_text(&input.geom)?;
        let changed = self.conn.borrow().execute(
            "UPDATE manholes SET name = ?1, geom = ?2, top_elevation = ?3, bottom_elevation = ?4,
                 overflow_elevation = ?5, design_flow_limit = ?6, inflow = ?7,
                 downstream_capacity = ?8
             WHERE id = ?9",
            params![
                input.name,
                geom,
                input.top_elevation,
                input.bottom_elevation,
                input.overflow_elevation,
                input.design_flow_limit,
                input.inflow,
                input.downstream_capacity,
                id
            ],
        )?;
        if changed == 0 {
            anyhow::bail!("manhole {} not found", id);
        }
        Ok(())
    }

    pub fn update_pipeline(&self, id: i64, input: &NewPipeline) -> anyhow::Result<()> {
        let geom = geometry_text(&input.geom)?;
        let changed = self.conn.borrow().execute(
            "UPDATE pipelines SET name = ?1, geom = ?2, diameter = ?3, slope = ?4,
                 material = ?5, design_flow = ?6
             WHERE id = ?7",
            params![
                input.name,
                geom,
                input.diameter,
                input.slope,
                input.material,
                input.design_flow,
                id
            ],
        )?;
        if changed == 0 {
            anyhow::bail!("pipeline {} not found", id);
        }
        Ok(())
    }

    pub fn update_catchment_area(&self, id: i64, input: &NewCatchmentArea) -> anyhow::Result<()> {
        let geom = geometry_text(&input.geom)?;
        let changed = self.conn.borrow().execute(
            "UPDATE catchment_areas SET name = ?1, geom = ?2, runoff_coefficient = ?3,
                 rainfall_intensity = ?4
             WHERE id = ?5",
            params![
                input.name,
                geom,
                input.runoff_coefficient,
                input.rainfall_intensity,
                id
            ],
        )?;
        if changed == 0 {
            anyhow::bail!("catchment area {} not found", id);
        }
        Ok(())
    }

    /// Delete one asset. Returns false when no row had that id.
    pub fn delete(&self, kind: AssetKind, id: i64) -> anyhow::Result<bool> {
        let changed = self.conn.borrow().execute(
            &format!("DELETE FROM {} WHERE id = ?1", kind.table()),
            params![id],
        )?;
        if changed > 0 {
            log::info!("[SWI] crud: deleted {} {}", kind, id);
        }
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;
    use swi_core::{AssetKind, NewCatchmentArea, NewManhole, NewPipeline};

    #[test]
    fn insert_assigns_increasing_ids() {
        let db = Database::new().unwrap();
        let a = db.insert_manhole(&NewManhole::default()).unwrap();
        let b = db.insert_manhole(&NewManhole::default()).unwrap();
        assert!(b > a);
    }

    #[test]
    fn update_changes_inputs_but_keeps_derived_fields() {
        let db = Database::new().unwrap();
        let id = db.insert_manhole(&NewManhole::default()).unwrap();
        db.conn
            .borrow()
            .execute(
                "UPDATE manholes SET calculated_water_level = -4.0, is_overflow = 0",
                [],
            )
            .unwrap();

        db.update_manhole(
            id,
            &NewManhole {
                name: "MH-renamed".to_string(),
                inflow: 0.08,
                ..NewManhole::default()
            },
        )
        .unwrap();

        let manhole = db.get_manhole(id).unwrap().unwrap();
        assert_eq!(manhole.name, "MH-renamed");
        assert_eq!(manhole.inflow, 0.08);
        assert_eq!(manhole.calculated_water_level, Some(-4.0));
        assert_eq!(manhole.is_overflow, Some(false));
    }

    #[test]
    fn updating_a_missing_asset_fails() {
        let db = Database::new().unwrap();
        assert!(db.update_pipeline(7, &NewPipeline::default()).is_err());
        assert!(db
            .update_catchment_area(7, &NewCatchmentArea::default())
            .is_err());
    }

    #[test]
    fn delete_reports_whether_a_row_went_away() {
        let db = Database::new().unwrap();
        let id = db.insert_pipeline(&NewPipeline::default()).unwrap();
        assert!(db.delete(AssetKind::Pipeline, id).unwrap());
        assert!(!db.delete(AssetKind::Pipeline, id).unwrap());
        assert!(db.get_pipeline(id).unwrap().is_none());
    }
}
