use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::asset::{CatchmentArea, Manhole, Pipeline};

/// The three asset kinds held in the inventory.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum AssetKind {
    Manhole,
    Pipeline,
    CatchmentArea,
}

impl AssetKind {
    /// Name of the table backing this kind.
    pub fn table(&self) -> &'static str {
        match self {
            AssetKind::Manhole => "manholes",
            AssetKind::Pipeline => "pipelines",
            AssetKind::CatchmentArea => "catchment_areas",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Manhole => write!(f, "manhole"),
            AssetKind::Pipeline => write!(f, "pipeline"),
            AssetKind::CatchmentArea => write!(f, "catchment area"),
        }
    }
}

impl FromStr for AssetKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manhole" | "manholes" => Ok(AssetKind::Manhole),
            "pipeline" | "pipelines" | "pipe" => Ok(AssetKind::Pipeline),
            "catchment" | "catchments" | "catchment_area" | "catchment_areas" => {
                Ok(AssetKind::CatchmentArea)
            }
            other => anyhow::bail!("unknown asset kind '{}'", other),
        }
    }
}

/// All assets of the inventory, each collection ordered by id.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Inventory {
    pub manholes: Vec<Manhole>,
    pub pipelines: Vec<Pipeline>,
    pub catchment_areas: Vec<CatchmentArea>,
}

impl Inventory {
    pub fn len(&self) -> usize {
        self.manholes.len() + self.pipelines.len() + self.catchment_areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Persistence collaborator used by the simulation.
///
/// `persist` writes the derived fields of every asset in the inventory and
/// must be all-or-nothing: either every row is updated or none is.
pub trait AssetStore {
    fn fetch_manholes(&self) -> anyhow::Result<Vec<Manhole>>;
    fn fetch_pipelines(&self) -> anyhow::Result<Vec<Pipeline>>;
    fn fetch_catchment_areas(&self) -> anyhow::Result<Vec<CatchmentArea>>;
    fn persist(&self, inventory: &Inventory) -> anyhow::Result<()>;

    /// Read the whole inventory as currently persisted.
    fn snapshot(&self) -> anyhow::Result<Inventory> {
        Ok(Inventory {
            manholes: self.fetch_manholes()?,
            pipelines: self.fetch_pipelines()?,
            catchment_areas: self.fetch_catchment_areas()?,
        })
    }
}
