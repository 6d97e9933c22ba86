use geojson::{Geometry, Value};
use std::cell::RefCell;
use swi_core::config::Config;
use swi_core::{
    AssetStore, CatchmentArea, Inventory, Manhole, NewCatchmentArea, NewManhole, NewPipeline,
    Pipeline,
};
use swi_db::Database;
use swi_sim::{capacity_check, run_simulation, Simulation, SimulationPhase};

fn square(lon: f64, lat: f64, size: f64) -> Geometry {
    Geometry::new(Value::Polygon(vec![vec![
        vec![lon, lat],
        vec![lon + size, lat],
        vec![lon + size, lat + size],
        vec![lon, lat + size],
        vec![lon, lat],
    ]]))
}

fn seeded_database() -> Database {
    let db = Database::new().unwrap();
    db.insert_manhole(&NewManhole {
        name: "MH-surcharged".to_string(),
        geom: Some(Geometry::new(Value::Point(vec![121.5, 25.0]))),
        top_elevation: 0.0,
        bottom_elevation: -5.0,
        overflow_elevation: -0.5,
        design_flow_limit: 0.1,
        inflow: 0.15,
        downstream_capacity: 0.2,
    })
    .unwrap();
    db.insert_manhole(&NewManhole {
        name: "MH-idle".to_string(),
        design_flow_limit: 0.0,
        inflow: 0.4,
        downstream_capacity: 0.1,
        ..NewManhole::default()
    })
    .unwrap();
    db.insert_pipeline(&NewPipeline {
        name: "P-trunk".to_string(),
        geom: Some(Geometry::new(Value::LineString(vec![
            vec![121.50, 25.0],
            vec![121.51, 25.0],
        ]))),
        diameter: 0.5,
        slope: 0.001,
        material: "concrete".to_string(),
        design_flow: 0.05,
    })
    .unwrap();
    db.insert_pipeline(&NewPipeline {
        name: "P-broken".to_string(),
        diameter: 0.0,
        ..NewPipeline::default()
    })
    .unwrap();
    db.insert_catchment_area(&NewCatchmentArea {
        name: "C-block".to_string(),
        geom: Some(square(121.50, 25.00, 0.001)),
        runoff_coefficient: 0.6,
        rainfall_intensity: 100.0,
    })
    .unwrap();
    db.insert_catchment_area(&NewCatchmentArea {
        name: "C-misconfigured".to_string(),
        geom: Some(square(121.52, 25.00, 0.001)),
        runoff_coefficient: 1.7,
        rainfall_intensity: 100.0,
    })
    .unwrap();
    db
}

#[test]
fn simulation_populates_every_derived_field() {
    let db = seeded_database();
    let inventory = run_simulation(&db, &Config::default()).unwrap();

    let surcharged = &inventory.manholes[0];
    assert_eq!(surcharged.calculated_water_level, Some(0.0));
    assert_eq!(surcharged.is_overflow, Some(true));

    let idle = &inventory.manholes[1];
    assert_eq!(idle.calculated_water_level, Some(-5.0));
    assert_eq!(idle.is_overflow, Some(false));

    let trunk = &inventory.pipelines[0];
    let length = trunk.calculated_length_m.unwrap();
    assert!(length > 1000.0 && length < 1020.0, "length was {}", length);
    assert_eq!(trunk.calculated_flow, Some(0.05));
    assert!((trunk.full_capacity_ratio.unwrap() - 41.87).abs() < 0.01);

    let broken = &inventory.pipelines[1];
    assert_eq!(broken.full_capacity_ratio, Some(0.0));

    let block = &inventory.catchment_areas[0];
    let area = block.calculated_area_sq_m.unwrap();
    assert!(area > 11_000.0 && area < 11_400.0, "area was {}", area);
    let expected = 0.6 * 100.0 * area / 3_600_000.0;
    assert!((block.calculated_peak_flow.unwrap() - expected).abs() < 1e-12);

    let misconfigured = &inventory.catchment_areas[1];
    assert_eq!(misconfigured.calculated_peak_flow, Some(0.0));
    assert!(misconfigured.calculated_area_sq_m.unwrap() > 0.0);
}

#[test]
fn committed_results_are_what_the_store_returns() {
    let db = seeded_database();
    let inventory = run_simulation(&db, &Config::default()).unwrap();
    assert_eq!(db.snapshot().unwrap(), inventory);
}

#[test]
fn running_twice_gives_identical_results() {
    let db = seeded_database();
    let first = run_simulation(&db, &Config::default()).unwrap();
    let second = run_simulation(&db, &Config::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn phases_move_from_pending_to_committed() {
    let db = seeded_database();
    let config = Config::default();
    let mut simulation = Simulation::new(&db, &config).unwrap();
    assert_eq!(simulation.phase(), SimulationPhase::Pending);
    simulation.run().unwrap();
    assert_eq!(simulation.phase(), SimulationPhase::Committed);
    assert!(simulation.run().is_err(), "a run executes only once");
}

#[test]
fn empty_inventory_commits() {
    let db = Database::new().unwrap();
    let inventory = run_simulation(&db, &Config::default()).unwrap();
    assert!(inventory.is_empty());
}

/// Adds an asset the database never stored, so its transaction must roll back.
struct StaleStore {
    inner: Database,
}

impl AssetStore for StaleStore {
    fn fetch_manholes(&self) -> anyhow::Result<Vec<Manhole>> {
        self.inner.fetch_manholes()
    }

    fn fetch_pipelines(&self) -> anyhow::Result<Vec<Pipeline>> {
        self.inner.fetch_pipelines()
    }

    fn fetch_catchment_areas(&self) -> anyhow::Result<Vec<CatchmentArea>> {
        self.inner.fetch_catchment_areas()
    }

    fn persist(&self, inventory: &Inventory) -> anyhow::Result<()> {
        let mut batch = inventory.clone();
        let mut ghost = batch.catchment_areas[0].clone();
        ghost.id = 10_000;
        batch.catchment_areas.push(ghost);
        self.inner.persist(&batch)
    }
}

#[test]
fn failed_commit_leaves_previous_results_untouched() {
    let db = seeded_database();
    let committed = run_simulation(&db, &Config::default()).unwrap();

    db.update_manhole(
        1,
        &NewManhole {
            name: "MH-surcharged".to_string(),
            inflow: 0.0,
            ..NewManhole::default()
        },
    )
    .unwrap();

    let stale = StaleStore { inner: db.clone() };
    let config = Config::default();
    let mut simulation = Simulation::new(&stale, &config).unwrap();
    let err = simulation.run().unwrap_err();
    assert_eq!(simulation.phase(), SimulationPhase::RolledBack);
    assert!(format!("{:#}", err).contains("catchment area 10000"));

    let after = db.snapshot().unwrap();
    assert_eq!(
        after.manholes[0].calculated_water_level,
        committed.manholes[0].calculated_water_level
    );
    assert_eq!(after.manholes[0].is_overflow, Some(true));
    assert_eq!(after.pipelines, committed.pipelines);
    assert_eq!(after.catchment_areas, committed.catchment_areas);
}

/// In-memory store, used to feed values SQLite would not hold.
#[derive(Default)]
struct MemoryStore {
    inventory: RefCell<Inventory>,
}

impl AssetStore for MemoryStore {
    fn fetch_manholes(&self) -> anyhow::Result<Vec<Manhole>> {
        Ok(self.inventory.borrow().manholes.clone())
    }

    fn fetch_pipelines(&self) -> anyhow::Result<Vec<Pipeline>> {
        Ok(self.inventory.borrow().pipelines.clone())
    }

    fn fetch_catchment_areas(&self) -> anyhow::Result<Vec<CatchmentArea>> {
        Ok(self.inventory.borrow().catchment_areas.clone())
    }

    fn persist(&self, inventory: &Inventory) -> anyhow::Result<()> {
        *self.inventory.borrow_mut() = inventory.clone();
        Ok(())
    }
}

fn manhole(id: i64, inflow: f64) -> Manhole {
    Manhole {
        id,
        name: format!("MH-{}", id),
        geom: None,
        top_elevation: 0.0,
        bottom_elevation: -5.0,
        overflow_elevation: -0.5,
        design_flow_limit: 0.1,
        inflow,
        downstream_capacity: 0.0,
        calculated_water_level: None,
        is_overflow: None,
    }
}

#[test]
fn non_finite_input_fails_the_whole_batch() {
    let store = MemoryStore::default();
    store.inventory.borrow_mut().manholes = vec![manhole(1, 0.05), manhole(2, f64::NAN)];

    let err = run_simulation(&store, &Config::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("manhole 2"));

    let inventory = store.inventory.borrow();
    assert!(inventory.manholes.iter().all(|m| m.calculated_water_level.is_none()));
}

#[test]
fn capacity_check_is_independent_of_the_level_rule() {
    let db = seeded_database();
    let checks = capacity_check(&db).unwrap();
    assert_eq!(checks.len(), 2);
    // Within downstream capacity although the level rule overflows.
    assert!(!checks[0].is_overflow);
    // Over downstream capacity although the level rule sits at the invert.
    assert!(checks[1].is_overflow);
    assert!((checks[1].water_level - (-0.5 + 0.3 * 0.1)).abs() < 1e-12);

    // Read-only: nothing derived was written.
    assert!(db
        .fetch_manholes()
        .unwrap()
        .iter()
        .all(|m| m.calculated_water_level.is_none()));
}

#[test]
fn fixture_inventory_simulates_end_to_end() {
    let db = Database::new().unwrap();
    db.load_manholes(include_str!("../../fixtures/manholes.csv")).unwrap();
    db.load_pipelines(include_str!("../../fixtures/pipelines.csv")).unwrap();
    db.load_catchment_areas(include_str!("../../fixtures/catchment_areas.csv"))
        .unwrap();

    let inventory = run_simulation(&db, &Config::default()).unwrap();
    assert_eq!(inventory.len(), 8);
    assert!(inventory.pipelines.iter().all(|p| p.calculated_length_m.unwrap() > 0.0));
    assert!(inventory
        .catchment_areas
        .iter()
        .all(|c| c.calculated_peak_flow.unwrap() > 0.0));

    // MH-003 has no design limit, so it stays at its invert.
    assert_eq!(inventory.manholes[2].calculated_water_level, Some(-4.2));
    assert_eq!(inventory.manholes[2].is_overflow, Some(false));

    // The park's hole is excluded from its area.
    let north = inventory.catchment_areas[0].calculated_area_sq_m.unwrap();
    let park = inventory.catchment_areas[1].calculated_area_sq_m.unwrap();
    assert!(park < north);
}
