//! Command implementations for the stormwater inventory CLI.
//!
//! Provides subcommands to manage the asset inventory and to run the
//! hydraulic simulation over it.

use anyhow::Context;
use clap::{Args, Subcommand};
use swi_core::config::Config;
use swi_db::Database;
use swi_geometry::Hemisphere;

pub mod inventory;
pub mod simulate;

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub struct Options {
    /// SQLite database file (`:memory:` for a throwaway database)
    #[arg(short = 'd', long, global = true, default_value = "stormwater.db")]
    pub database: String,

    /// JSON configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<String>,

    /// UTM zone used to measure lengths and areas (overrides the config file)
    #[arg(long, global = true)]
    pub utm_zone: Option<u8>,

    /// Use the southern-hemisphere variant of the UTM zone
    #[arg(long, global = true)]
    pub southern: bool,
}

impl Options {
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(zone) = self.utm_zone {
            config.projection.zone = zone;
        }
        if self.southern {
            config.projection.hemisphere = Hemisphere::South;
        }
        config.utm_zone().context("invalid projection settings")?;
        Ok(config)
    }

    pub fn open_database(&self) -> anyhow::Result<Database> {
        Database::open(&self.database)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database schema
    Init,

    /// Import assets from CSV files
    Import {
        /// Manholes CSV
        #[arg(short = 'm', long)]
        manholes: Option<String>,

        /// Pipelines CSV
        #[arg(short = 'p', long)]
        pipelines: Option<String>,

        /// Catchment areas CSV
        #[arg(short = 'a', long)]
        catchments: Option<String>,
    },

    /// Print the inventory as JSON
    List,

    /// Add an asset from JSON attributes; missing attributes take defaults
    Add {
        /// manhole, pipeline or catchment
        kind: String,
        /// e.g. '{"name": "MH-1", "inflow": 0.05}'
        attributes: String,
    },

    /// Change input attributes of an asset; attributes not given are kept
    Update {
        kind: String,
        id: i64,
        attributes: String,
    },

    /// Delete an asset
    Delete { kind: String, id: i64 },

    /// Recompute every derived field and commit them together
    Simulate {
        /// Write the refreshed inventory here instead of stdout
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Judge manholes by inflow against downstream capacity (read-only)
    CapacityCheck,
}

pub fn run(options: &Options, command: Command) -> anyhow::Result<()> {
    let db = options.open_database()?;
    match command {
        Command::Init => {
            log::info!("Schema ready in {}", options.database);
            Ok(())
        }
        Command::Import {
            manholes,
            pipelines,
            catchments,
        } => inventory::run_import(
            &db,
            manholes.as_deref(),
            pipelines.as_deref(),
            catchments.as_deref(),
        ),
        Command::List => inventory::run_list(&db),
        Command::Add { kind, attributes } => inventory::run_add(&db, &kind, &attributes),
        Command::Update {
            kind,
            id,
            attributes,
        } => inventory::run_update(&db, &kind, id, &attributes),
        Command::Delete { kind, id } => inventory::run_delete(&db, &kind, id),
        Command::Simulate { output } => {
            let config = options.load_config()?;
            simulate::run_simulate(&db, &config, output.as_deref())
        }
        Command::CapacityCheck => simulate::run_capacity_check(&db),
    }
}
