//! CSV import for populating the inventory.
//!
//! Each loader reads CSV with a header row, fixed column order, and inserts
//! one asset per row. An empty numeric field takes the column default; a
//! field that does not parse, or a geometry that is not GeoJSON, skips the
//! row.
//!
//! # CSV Formats
//!
//! - **Manholes**: `name,geom,top_elevation,bottom_elevation,overflow_elevation,design_flow_limit,inflow,downstream_capacity`
//! - **Pipelines**: `name,geom,diameter,slope,material,design_flow`
//! - **Catchment areas**: `name,geom,runoff_coefficient,rainfall_intensity`
//!
//! The `geom` column holds a GeoJSON geometry object (quoted CSV field) or
//! is left empty.

use csv::StringRecord;
use geojson::Geometry;
use swi_core::{NewCatchmentArea, NewManhole, NewPipeline};

use crate::Database;

fn reader(csv_data: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes())
}

/// Numeric field `idx`, `default` when empty, `None` when unparsable.
fn number(r: &StringRecord, idx: usize, default: f64) -> Option<f64> {
    match r.get(idx).map(str::trim) {
        None | Some("") => Some(default),
        Some(s) => s.parse().ok(),
    }
}

/// Geometry field `idx`: `Some(None)` when empty, `None` when unreadable.
fn geometry(r: &StringRecord, idx: usize) -> Option<Option<Geometry>> {
    match r.get(idx).map(str::trim) {
        None | Some("") => Some(None),
        Some(s) => serde_json::from_str::<Geometry>(s).ok().map(Some),
    }
}

fn text(r: &StringRecord, idx: usize, default: &str) -> String {
    match r.get(idx).map(str::trim) {
        None | Some("") => default.to_string(),
        Some(s) => s.to_string(),
    }
}

fn parse_manhole(r: &StringRecord) -> Option<NewManhole> {
    let d = NewManhole::default();
    Some(NewManhole {
        name: text(r, 0, &d.name),
        geom: geometry(r, 1)?,
        top_elevation: number(r, 2, d.top_elevation)?,
        bottom_elevation: number(r, 3, d.bottom_elevation)?,
        overflow_elevation: number(r, 4, d.overflow_elevation)?,
        design_flow_limit: number(r, 5, d.design_flow_limit)?,
        inflow: number(r, 6, d.inflow)?,
        downstream_capacity: number(r, 7, d.downstream_capacity)?,
    })
}

fn parse_pipeline(r: &StringRecord) -> Option<NewPipeline> {
    let d = NewPipeline::default();
    Some(NewPipeline {
        name: text(r, 0, &d.name),
        geom: geometry(r, 1)?,
        diameter: number(r, 2, d.diameter)?,
        slope: number(r, 3, d.slope)?,
        material: text(r, 4, &d.material),
        design_flow: number(r, 5, d.design_flow)?,
    })
}

fn parse_catchment_area(r: &StringRecord) -> Option<NewCatchmentArea> {
    let d = NewCatchmentArea::default();
    Some(NewCatchmentArea {
        name: text(r, 0, &d.name),
        geom: geometry(r, 1)?,
        runoff_coefficient: number(r, 2, d.runoff_coefficient)?,
        rainfall_intensity: number(r, 3, d.rainfall_intensity)?,
    })
}

impl Database {
    /// Load manholes from CSV. Returns the number of rows inserted.
    ///
    /// # Example CSV
    /// ```text
    /// name,geom,top_elevation,bottom_elevation,overflow_elevation,design_flow_limit,inflow,downstream_capacity
    /// MH-1,"{""type"":""Point"",""coordinates"":[121.5,25.0]}",0.0,-5.0,-0.5,0.1,0.05,0.08
    /// ```
    pub fn load_manholes(&self, csv_data: &str) -> anyhow::Result<usize> {
        let mut count = 0;
        let mut skipped = 0;
        for result in reader(csv_data).records() {
            match parse_manhole(&result?) {
                Some(input) => {
                    self.insert_manhole(&input)?;
                    count += 1;
                }
                None => skipped += 1,
            }
        }
        log::info!(
            "[SWI] loader: Loaded {} manholes, skipped {} invalid",
            count,
            skipped
        );
        Ok(count)
    }

    /// Load pipelines from CSV. Returns the number of rows inserted.
    ///
    /// # Example CSV
    /// ```text
    /// name,geom,diameter,slope,material,design_flow
    /// P-1,"{""type"":""LineString"",""coordinates"":[[121.5,25.0],[121.51,25.0]]}",0.5,0.001,concrete,0.05
    /// ```
    pub fn load_pipelines(&self, csv_data: &str) -> anyhow::Result<usize> {
        let mut count = 0;
        let mut skipped = 0;
        for result in reader(csv_data).records() {
            match parse_pipeline(&result?) {
                Some(input) => {
                    self.insert_pipeline(&input)?;
                    count += 1;
                }
                None => skipped += 1,
            }
        }
        log::info!(
            "[SWI] loader: Loaded {} pipelines, skipped {} invalid",
            count,
            skipped
        );
        Ok(count)
    }

    /// Load catchment areas from CSV. Returns the number of rows inserted.
    pub fn load_catchment_areas(&self, csv_data: &str) -> anyhow::Result<usize> {
        let mut count = 0;
        let mut skipped = 0;
        for result in reader(csv_data).records() {
            match parse_catchment_area(&result?) {
                Some(input) => {
                    self.insert_catchment_area(&input)?;
                    count += 1;
                }
                None => skipped += 1,
            }
        }
        log::info!(
            "[SWI] loader: Loaded {} catchment areas, skipped {} invalid",
            count,
            skipped
        );
        Ok(count)
    }
}
