//! Core types for the stormwater infrastructure inventory.
//!
//! Three independent asset kinds are modelled here: [`asset::Manhole`],
//! [`asset::Pipeline`] and [`asset::CatchmentArea`]. None of them refers to
//! another; the hydraulic estimation evaluates each asset on its own.
//!
//! Persistence is abstracted behind [`inventory::AssetStore`] so the
//! simulation can run against SQLite or any other store.

pub mod asset;
pub mod config;
pub mod inventory;
pub mod material;

pub use asset::{CatchmentArea, Manhole, NewCatchmentArea, NewManhole, NewPipeline, Pipeline};
pub use inventory::{AssetKind, AssetStore, Inventory};
pub use material::Material;
