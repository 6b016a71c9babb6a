//! Shared fixtures for the integration tests
#![allow(dead_code)]

use cirrus_core::core_types::{CellState, Celsius, IceWaterContent};
use cirrus_core::grid::Grid;
use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness; `RUST_LOG=debug` to see it
#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Build a curtain from rows of (state, °C, mg/m³), top row first
pub fn curtain(rows: &[&[(CellState, f64, f64)]]) -> Grid {
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.len());
    Grid::from_fn(width, height, |p| {
        let (state, t, iwc) = rows[p.y][p.x];
        (state, Celsius::new(t), IceWaterContent::new(iwc))
    })
    .unwrap()
}

/// States in row-major order
pub fn states(grid: &Grid) -> Vec<CellState> {
    grid.cells().iter().map(|c| c.state()).collect()
}
