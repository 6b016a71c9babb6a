//! Terminal sweep once anvil growth has stalled
//!
//! Unclassified ice colder than the homogeneous freezing threshold could not
//! be reached from any core, so it formed in place: it becomes in-situ cirrus.
//! Warmer leftover ice stays unclassified; it is never reclassified by a
//! threshold alone.

use super::constraints::satisfies_temperature;
use crate::core_types::{CellState, Position};
use crate::grid::Grid;
use rayon::prelude::*;
use tracing::trace;

/// Result of the finalization sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizationReport {
    /// At least one cell became in-situ cirrus
    pub progressed: bool,
    /// Cells that became in-situ cirrus, in row-major order
    pub transitions: Vec<Position>,
}

/// Reclassify every remaining cold unclassified cell as in-situ cirrus.
///
/// The predicate is static, so a second sweep never finds anything new.
pub fn finalize(grid: &mut Grid) -> FinalizationReport {
    grid.clear_change_flags();

    let transitions: Vec<Position> = grid
        .cells()
        .par_iter()
        .filter(|c| c.state() == CellState::UnclassifiedIce && satisfies_temperature(c))
        .map(|c| c.position())
        .collect();

    for &pos in &transitions {
        if let Some(cell) = grid.cell_at_mut(pos) {
            cell.transition(CellState::InSitu);
        }
    }

    trace!("Finalization: {} new in-situ cells", transitions.len());

    FinalizationReport {
        progressed: !transitions.is_empty(),
        transitions,
    }
}
