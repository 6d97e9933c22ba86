use geojson::Geometry;
use serde::{Deserialize, Serialize};

use crate::material::Material;

/// A manhole (inspection chamber) with its elevations and hydraulic inputs.
///
/// Elevations are in meters and may be negative. `overflow_elevation` is
/// expected to lie between `bottom_elevation` and `top_elevation`, but
/// nothing enforces it.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Manhole {
    pub id: i64,
    pub name: String,
    /// Point location, used for mapping only.
    pub geom: Option<Geometry>,
    pub top_elevation: f64,
    /// Invert elevation.
    pub bottom_elevation: f64,
    pub overflow_elevation: f64,
    /// Design flow limit in CMS.
    pub design_flow_limit: f64,
    /// Inflow in CMS.
    pub inflow: f64,
    /// Downstream capacity in CMS. Only the capacity-based overflow check reads it.
    pub downstream_capacity: f64,
    /// Derived water level in meters, `None` before the first simulation run.
    pub calculated_water_level: Option<f64>,
    pub is_overflow: Option<bool>,
}

/// A circular gravity pipe.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: i64,
    pub name: String,
    /// Centerline path.
    pub geom: Option<Geometry>,
    /// Diameter in meters.
    pub diameter: f64,
    /// Slope as rise over run.
    pub slope: f64,
    /// Material as entered; see [`Pipeline::material_kind`].
    pub material: String,
    /// Design flow in CMS.
    pub design_flow: f64,
    pub calculated_length_m: Option<f64>,
    pub calculated_flow: Option<f64>,
    /// Percent of full-bore capacity consumed.
    pub full_capacity_ratio: Option<f64>,
}

impl Pipeline {
    pub fn material_kind(&self) -> Material {
        Material::parse(&self.material)
    }
}

/// A drainage catchment polygon.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CatchmentArea {
    pub id: i64,
    pub name: String,
    /// Polygon, possibly with holes.
    pub geom: Option<Geometry>,
    /// Dimensionless, conventionally 0-1.
    pub runoff_coefficient: f64,
    /// Rainfall intensity in mm/hr.
    pub rainfall_intensity: f64,
    pub calculated_area_sq_m: Option<f64>,
    /// Peak runoff in CMS.
    pub calculated_peak_flow: Option<f64>,
}

/// Input attributes for creating or editing a manhole.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewManhole {
    pub name: String,
    pub geom: Option<Geometry>,
    pub top_elevation: f64,
    pub bottom_elevation: f64,
    pub overflow_elevation: f64,
    pub design_flow_limit: f64,
    pub inflow: f64,
    pub downstream_capacity: f64,
}

impl Default for NewManhole {
    fn default() -> Self {
        Self {
            name: "New manhole".to_string(),
            geom: None,
            top_elevation: 0.0,
            bottom_elevation: -5.0,
            overflow_elevation: -0.5,
            design_flow_limit: 0.1,
            inflow: 0.0,
            downstream_capacity: 0.0,
        }
    }
}

impl From<&Manhole> for NewManhole {
    fn from(m: &Manhole) -> Self {
        Self {
            name: m.name.clone(),
            geom: m.geom.clone(),
            top_elevation: m.top_elevation,
            bottom_elevation: m.bottom_elevation,
            overflow_elevation: m.overflow_elevation,
            design_flow_limit: m.design_flow_limit,
            inflow: m.inflow,
            downstream_capacity: m.downstream_capacity,
        }
    }
}

/// Input attributes for creating or editing a pipeline.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPipeline {
    pub name: String,
    pub geom: Option<Geometry>,
    pub diameter: f64,
    pub slope: f64,
    pub material: String,
    pub design_flow: f64,
}

impl Default for NewPipeline {
    fn default() -> Self {
        Self {
            name: "New pipeline".to_string(),
            geom: None,
            diameter: 0.5,
            slope: 0.001,
            material: "concrete".to_string(),
            design_flow: 0.1,
        }
    }
}

impl From<&Pipeline> for NewPipeline {
    fn from(p: &Pipeline) -> Self {
        Self {
            name: p.name.clone(),
            geom: p.geom.clone(),
            diameter: p.diameter,
            slope: p.slope,
            material: p.material.clone(),
            design_flow: p.design_flow,
        }
    }
}

/// Input attributes for creating or editing a catchment area.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewCatchmentArea {
    pub name: String,
    pub geom: Option<Geometry>,
    pub runoff_coefficient: f64,
    pub rainfall_intensity: f64,
}

impl Default for NewCatchmentArea {
    fn default() -> Self {
        Self {
            name: "New catchment area".to_string(),
            geom: None,
            runoff_coefficient: 0.5,
            rainfall_intensity: 50.0,
        }
    }
}

impl From<&CatchmentArea> for NewCatchmentArea {
    fn from(c: &CatchmentArea) -> Self {
        Self {
            name: c.name.clone(),
            geom: c.geom.clone(),
            runoff_coefficient: c.runoff_coefficient,
            rainfall_intensity: c.rainfall_intensity,
        }
    }
}
