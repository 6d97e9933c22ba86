//! Typed read queries for the three asset tables.
//!
//! Every collection comes back ordered by id. A geometry column that is not
//! valid GeoJSON fails the whole query: the inventory cannot be trusted if
//! its stored payloads are unreadable.

use geojson::Geometry;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use swi_core::{CatchmentArea, Manhole, Pipeline};

use crate::Database;

const MANHOLE_COLUMNS: &str = "id, name, geom, top_elevation, bottom_elevation, \
     overflow_elevation, design_flow_limit, inflow, downstream_capacity, \
     calculated_water_level, is_overflow";

const PIPELINE_COLUMNS: &str = "id, name, geom, diameter, slope, material, design_flow, \
     calculated_length_m, calculated_flow, full_capacity_ratio";

const CATCHMENT_COLUMNS: &str = "id, name, geom, runoff_coefficient, rainfall_intensity, \
     calculated_area_sq_m, calculated_peak_flow";

/// Decode the GeoJSON text in column `idx`.
fn geometry_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Geometry>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => serde_json::from_str::<Geometry>(&text)
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
    }
}

fn manhole_from_row(row: &Row<'_>) -> rusqlite::Result<Manhole> {
    Ok(Manhole {
        id: row.get(0)?,
        name: row.get(1)?,
        geom: geometry_at(row, 2)?,
        top_elevation: row.get(3)?,
        bottom_elevation: row.get(4)?,
        overflow_elevation: row.get(5)?,
        design_flow_limit: row.get(6)?,
        inflow: row.get(7)?,
        downstream_capacity: row.get(8)?,
        calculated_water_level: row.get(9)?,
        is_overflow: row.get(10)?,
    })
}

fn pipeline_from_row(row: &Row<'_>) -> rusqlite::Result<Pipeline> {
    Ok(Pipeline {
        id: row.get(0)?,
        name: row.get(1)?,
        geom: geometry_at(row, 2)?,
        diameter: row.get(3)?,
        slope: row.get(4)?,
        material: row.get(5)?,
        design_flow: row.get(6)?,
        calculated_length_m: row.get(7)?,
        calculated_flow: row.get(8)?,
        full_capacity_ratio: row.get(9)?,
    })
}

fn catchment_from_row(row: &Row<'_>) -> rusqlite::Result<CatchmentArea> {
    Ok(CatchmentArea {
        id: row.get(0)?,
        name: row.get(1)?,
        geom: geometry_at(row, 2)?,
        runoff_coefficient: row.get(3)?,
        rainfall_intensity: row.get(4)?,
        calculated_area_sq_m: row.get(5)?,
        calculated_peak_flow: row.get(6)?,
    })
}

impl Database {
    /// All manholes, ordered by id.
    pub fn query_manholes(&self) -> anyhow::Result<Vec<Manhole>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM manholes ORDER BY id",
            MANHOLE_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], manhole_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("[SWI] query: query_manholes returned {} records", rows.len());
        Ok(rows)
    }

    /// All pipelines, ordered by id.
    pub fn query_pipelines(&self) -> anyhow::Result<Vec<Pipeline>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM pipelines ORDER BY id",
            PIPELINE_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], pipeline_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("[SWI] query: query_pipelines returned {} records", rows.len());
        Ok(rows)
    }

    /// All catchment areas, ordered by id.
    pub fn query_catchment_areas(&self) -> anyhow::Result<Vec<CatchmentArea>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM catchment_areas ORDER BY id",
            CATCHMENT_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], catchment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "[SWI] query: query_catchment_areas returned {} records",
            rows.len()
        );
        Ok(rows)
    }

    pub fn get_manhole(&self, id: i64) -> anyhow::Result<Option<Manhole>> {
        let conn = self.conn.borrow();
        let found = conn
            .query_row(
                &format!("SELECT {} FROM manholes WHERE id = ?1", MANHOLE_COLUMNS),
                params![id],
                manhole_from_row,
            )
            .optional()?;
        Ok(found)
    }

    pub fn get_pipeline(&self, id: i64) -> anyhow::Result<Option<Pipeline>> {
        let conn = self.conn.borrow();
        let found = conn
            .query_row(
                &format!("SELECT {} FROM pipelines WHERE id = ?1", PIPELINE_COLUMNS),
                params![id],
                pipeline_from_row,
            )
            .optional()?;
        Ok(found)
    }

    pub fn get_catchment_area(&self, id: i64) -> anyhow::Result<Option<CatchmentArea>> {
        let conn = self.conn.borrow();
        let found = conn
            .query_row(
                &format!(
                    "SELECT {} FROM catchment_areas WHERE id = ?1",
                    CATCHMENT_COLUMNS
                ),
                params![id],
                catchment_from_row,
            )
            .optional()?;
        Ok(found)
    }
}
