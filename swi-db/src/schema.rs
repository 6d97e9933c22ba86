//! SQL schema definitions.
//!
//! Column defaults are the values a freshly drawn asset gets when the
//! editor supplies nothing else.

/// Returns the full SQL schema as a single batch string.
///
/// Creates `manholes`, `pipelines` and `catchment_areas`. Each table holds
/// the asset's input attributes followed by its derived columns.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS manholes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        geom TEXT,
        top_elevation REAL NOT NULL DEFAULT 0.0,
        bottom_elevation REAL NOT NULL DEFAULT -5.0,
        overflow_elevation REAL NOT NULL DEFAULT -0.5,
        design_flow_limit REAL NOT NULL DEFAULT 0.1,
        inflow REAL NOT NULL DEFAULT 0.0,
        downstream_capacity REAL NOT NULL DEFAULT 0.0,
        calculated_water_level REAL,
        is_overflow INTEGER
    );

    CREATE TABLE IF NOT EXISTS pipelines (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        geom TEXT,
        diameter REAL NOT NULL DEFAULT 0.5,
        slope REAL NOT NULL DEFAULT 0.001,
        material TEXT NOT NULL DEFAULT 'concrete',
        design_flow REAL NOT NULL DEFAULT 0.1,
        calculated_length_m REAL,
        calculated_flow REAL,
        full_capacity_ratio REAL
    );

    CREATE TABLE IF NOT EXISTS catchment_areas (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        geom TEXT,
        runoff_coefficient REAL NOT NULL DEFAULT 0.5,
        rainfall_intensity REAL NOT NULL DEFAULT 50.0,
        calculated_area_sq_m REAL,
        calculated_peak_flow REAL
    );
    "#
}
