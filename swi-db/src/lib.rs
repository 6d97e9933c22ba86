//! SQLite persistence for the stormwater inventory.
//!
//! One table per asset kind; geometries are stored as GeoJSON text. The
//! [`Database`] type implements [`swi_core::AssetStore`], so the simulation
//! reads its snapshot from here and writes derived fields back in a single
//! transaction.
//!
//! # Usage
//!
//! ```rust
//! use swi_core::{AssetStore, NewPipeline};
//! use swi_db::Database;
//!
//! let db = Database::new().unwrap();
//! let id = db.insert_pipeline(&NewPipeline::default()).unwrap();
//! let pipelines = db.fetch_pipelines().unwrap();
//! assert_eq!(pipelines[0].id, id);
//! assert!(pipelines[0].calculated_flow.is_none());
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.
//!
//! - `manholes` - point assets with elevations, inflow and design limit
//! - `pipelines` - line assets with diameter, slope, material, design flow
//! - `catchment_areas` - polygon assets with runoff coefficient and rainfall intensity
//!
//! Derived columns are NULL until the first simulation run.

pub mod schema;
mod crud;
mod loader;
mod queries;
mod store;

use anyhow::Context;
use rusqlite::Connection;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// SQLite database holding the asset inventory.
///
/// Cheaply cloneable (via `Rc`); clones share one connection. Not `Send`:
/// simulation runs are expected to be serialized by the caller.
///
/// # Example
///
/// ```rust
/// use swi_core::AssetStore;
/// use swi_db::Database;
///
/// let db = Database::new().unwrap();
/// assert!(db.snapshot().unwrap().is_empty());
/// ```
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    /// Open (or create) a database file and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database {}", path.display()))?;
        log::info!("[SWI] db: opened {}", path.display());
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}
