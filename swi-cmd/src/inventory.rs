//! Inventory management commands: import, list, add, update, delete.

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use swi_core::{AssetKind, AssetStore, NewCatchmentArea, NewManhole, NewPipeline};
use swi_db::Database;

pub fn run_import(
    db: &Database,
    manholes: Option<&str>,
    pipelines: Option<&str>,
    catchments: Option<&str>,
) -> anyhow::Result<()> {
    if manholes.is_none() && pipelines.is_none() && catchments.is_none() {
        anyhow::bail!("nothing to import: pass --manholes, --pipelines or --catchments");
    }
    if let Some(path) = manholes {
        let count = db.load_manholes(&read(path)?)?;
        log::info!("Imported {} manholes from {}", count, path);
    }
    if let Some(path) = pipelines {
        let count = db.load_pipelines(&read(path)?)?;
        log::info!("Imported {} pipelines from {}", count, path);
    }
    if let Some(path) = catchments {
        let count = db.load_catchment_areas(&read(path)?)?;
        log::info!("Imported {} catchment areas from {}", count, path);
    }
    Ok(())
}

fn read(path: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))
}

pub fn run_list(db: &Database) -> anyhow::Result<()> {
    let inventory = db.snapshot()?;
    println!("{}", serde_json::to_string_pretty(&inventory)?);
    Ok(())
}

pub fn run_add(db: &Database, kind: &str, attributes: &str) -> anyhow::Result<()> {
    let kind: AssetKind = kind.parse()?;
    let id = match kind {
        AssetKind::Manhole => db.insert_manhole(&parse::<NewManhole>(attributes)?)?,
        AssetKind::Pipeline => db.insert_pipeline(&parse::<NewPipeline>(attributes)?)?,
        AssetKind::CatchmentArea => {
            db.insert_catchment_area(&parse::<NewCatchmentArea>(attributes)?)?
        }
    };
    log::info!("Added {} {}", kind, id);
    println!("{}", id);
    Ok(())
}

pub fn run_update(db: &Database, kind: &str, id: i64, attributes: &str) -> anyhow::Result<()> {
    let kind: AssetKind = kind.parse()?;
    let not_found = || anyhow::anyhow!("{} {} not found", kind, id);
    match kind {
        AssetKind::Manhole => {
            let current = db.get_manhole(id)?.ok_or_else(not_found)?;
            let merged = merge_attributes(&NewManhole::from(&current), attributes)?;
            db.update_manhole(id, &merged)?;
        }
        AssetKind::Pipeline => {
            let current = db.get_pipeline(id)?.ok_or_else(not_found)?;
            let merged = merge_attributes(&NewPipeline::from(&current), attributes)?;
            db.update_pipeline(id, &merged)?;
        }
        AssetKind::CatchmentArea => {
            let current = db.get_catchment_area(id)?.ok_or_else(not_found)?;
            let merged = merge_attributes(&NewCatchmentArea::from(&current), attributes)?;
            db.update_catchment_area(id, &merged)?;
        }
    }
    log::info!("Updated {} {}", kind, id);
    Ok(())
}

pub fn run_delete(db: &Database, kind: &str, id: i64) -> anyhow::Result<()> {
    let kind: AssetKind = kind.parse()?;
    if !db.delete(kind, id)? {
        anyhow::bail!("{} {} not found", kind, id);
    }
    Ok(())
}

fn parse<T: DeserializeOwned>(attributes: &str) -> anyhow::Result<T> {
    serde_json::from_str(attributes).context("attributes must be a JSON object")
}

/// Overlay the keys of the JSON object `patch` onto `base`.
pub fn merge_attributes<T>(base: &T, patch: &str) -> anyhow::Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = serde_json::to_value(base)?;
    let patch: serde_json::Value = parse(patch)?;
    let (Some(target), Some(changes)) = (merged.as_object_mut(), patch.as_object()) else {
        anyhow::bail!("attributes must be a JSON object");
    };
    for (key, value) in changes {
        target.insert(key.clone(), value.clone());
    }
    Ok(serde_json::from_value(merged)?)
}
