//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use grid_twin::assets::SensorKey;
use grid_twin::config::TwinConfig;
use grid_twin::sim::engine::Engine;
use grid_twin::sim::types::AssetStatus;

/// Default configuration (Bulawayo grid, seed 42).
pub fn default_config() -> TwinConfig {
    TwinConfig::bulawayo()
}

/// Engine built from the default configuration.
pub fn default_engine() -> Engine {
    Engine::from_config(&default_config())
}

/// Engine that has already run `ticks` one-second ticks.
pub fn warmed_engine(ticks: usize) -> Engine {
    let mut engine = default_engine();
    for t in 0..ticks {
        engine.step(t as f64);
    }
    engine
}

/// Finds the row for `key`, panicking with the full table if absent.
pub fn row_for(rows: &[AssetStatus], key: SensorKey) -> &AssetStatus {
    rows.iter()
        .find(|r| r.id == key)
        .unwrap_or_else(|| panic!("no row for {key} in {rows:?}"))
}
