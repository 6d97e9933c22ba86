//! Simulation orchestrator.
//!
//! A run takes a snapshot of every manhole, pipeline and catchment area,
//! recomputes their derived fields in memory, and hands the whole batch to
//! the store to commit at once:
//!
//! ```text
//! pending -> computing -> committed
//!                      -> rolled_back
//! ```
//!
//! Degenerate inputs (zero diameter, negative slope, unusable geometry, ...)
//! produce neutral values and never fail a run. Anything else that goes
//! wrong fails the whole run and leaves the stored derived fields as they
//! were.
//!
//! ```rust
//! use swi_core::{config::Config, NewManhole};
//! use swi_db::Database;
//!
//! let db = Database::new().unwrap();
//! db.insert_manhole(&NewManhole { inflow: 0.05, ..NewManhole::default() }).unwrap();
//! let inventory = swi_sim::run_simulation(&db, &Config::default()).unwrap();
//! assert_eq!(inventory.manholes[0].is_overflow, Some(false));
//! ```

pub mod capacity;
pub mod compute;
mod run;

pub use capacity::{capacity_check, CapacityCheck};
pub use run::{run_simulation, Simulation, SimulationPhase};
