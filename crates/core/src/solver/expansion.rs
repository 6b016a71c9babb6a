//! One synchronous anvil-growth pass
//!
//! Every source (convection core or anvil) tries to claim its 4-neighbors.
//! Candidate transitions are evaluated in parallel against the grid as it was
//! at the start of the step and applied only once evaluation is complete, so
//! the outcome never depends on source or neighbor traversal order.

use super::constraints::can_grow_into;
use crate::core_types::{CellState, Position};
use crate::grid::Grid;
use rayon::prelude::*;
use rustc_hash::{FxBuildHasher, FxHashSet};
use tracing::trace;

/// Result of a single expansion step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionReport {
    /// At least one cell became anvil
    pub changed: bool,
    /// Cells that became anvil, in row-major order
    pub transitions: Vec<Position>,
}

/// Advance the grid by one expansion step in place.
///
/// Clears every `just_changed` flag, then promotes each unclassified ice cell
/// that at least one adjacent source can grow into.
pub fn expand(grid: &mut Grid) -> ExpansionReport {
    grid.clear_change_flags();

    let sources = source_positions(grid);
    let transitions = collect_transitions(grid, &sources);

    for &pos in &transitions {
        if let Some(cell) = grid.cell_at_mut(pos) {
            cell.transition(CellState::Anvil);
        }
    }

    trace!(
        "Expansion step: {} sources, {} new anvil cells",
        sources.len(),
        transitions.len()
    );

    ExpansionReport {
        changed: !transitions.is_empty(),
        transitions,
    }
}

/// Pure form of [`expand`]: `(Grid) -> (Grid, report)`
pub fn expanded(grid: &Grid) -> (Grid, ExpansionReport) {
    let mut next = grid.clone();
    let report = expand(&mut next);
    (next, report)
}

/// Every cell that may propagate anvil classification this step
pub(crate) fn source_positions(grid: &Grid) -> Vec<Position> {
    grid.cells()
        .iter()
        .filter(|c| c.state().is_source())
        .map(|c| c.position())
        .collect()
}

/// Evaluate all (source, neighbor) pairs against the unmodified grid.
///
/// Returns each qualifying target once, in row-major order, regardless of
/// how many sources qualified it or the order `sources` is given in.
pub(crate) fn collect_transitions(grid: &Grid, sources: &[Position]) -> Vec<Position> {
    let candidates: Vec<Position> = sources
        .par_iter()
        .filter_map(move |&pos| grid.cell_at(pos))
        .flat_map_iter(move |source| {
            grid.neighbors(source.position()).filter(move |&target_pos| {
                grid.cell_at(target_pos)
                    .is_some_and(|target| can_grow_into(source, target))
            })
        })
        .collect();

    let mut seen = FxHashSet::with_capacity_and_hasher(candidates.len(), FxBuildHasher);
    let mut transitions: Vec<Position> = candidates
        .into_iter()
        .filter(|pos| seen.insert(*pos))
        .collect();
    transitions.sort_unstable_by_key(|pos| (pos.y, pos.x));
    transitions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Celsius, IceWaterContent};

    /// Build a single-row curtain from (state, temperature, iwc) triples
    fn strip(cells: &[(CellState, f64, f64)]) -> Grid {
        Grid::from_fn(cells.len(), 1, |p| {
            let (state, t, iwc) = cells[p.x];
            (state, Celsius::new(t), IceWaterContent::new(iwc))
        })
        .unwrap()
    }

    fn states(grid: &Grid) -> Vec<CellState> {
        grid.cells().iter().map(|c| c.state()).collect()
    }

    #[test]
    fn test_core_claims_cold_neighbor() {
        let mut grid = strip(&[
            (CellState::ConvectionCore, -60.0, 1000.0),
            (CellState::UnclassifiedIce, -40.0, 200.0),
            (CellState::UnclassifiedIce, -30.0, 400.0),
        ]);

        let report = expand(&mut grid);

        assert!(report.changed);
        assert_eq!(report.transitions, vec![Position::new(1, 0)]);
        assert_eq!(
            states(&grid),
            vec![
                CellState::ConvectionCore,
                CellState::Anvil,
                CellState::UnclassifiedIce
            ]
        );
        assert!(grid.get(1, 0).unwrap().just_changed());
        assert!(!grid.get(2, 0).unwrap().just_changed());
    }

    #[test]
    fn test_growth_is_one_ring_per_step() {
        let mut grid = strip(&[
            (CellState::ConvectionCore, -60.0, 100.0),
            (CellState::UnclassifiedIce, -50.0, 100.0),
            (CellState::UnclassifiedIce, -50.0, 100.0),
            (CellState::UnclassifiedIce, -50.0, 100.0),
        ]);

        expand(&mut grid);
        assert_eq!(grid.count(CellState::Anvil), 1);

        expand(&mut grid);
        assert_eq!(grid.count(CellState::Anvil), 2);
        // Flags only mark the latest ring
        assert_eq!(
            grid.changed_positions().collect::<Vec<_>>(),
            vec![Position::new(2, 0)]
        );

        expand(&mut grid);
        assert_eq!(grid.count(CellState::Anvil), 3);

        let report = expand(&mut grid);
        assert!(!report.changed);
        assert_eq!(grid.changed_positions().count(), 0);
    }

    #[test]
    fn test_continuity_uses_immediate_source() {
        // Anvil at 100 can reach 150 but not 151; the 151 cell is only
        // adjacent to the anvil cell, never to the core.
        let mut grid = strip(&[
            (CellState::ConvectionCore, -60.0, 100.0),
            (CellState::UnclassifiedIce, -50.0, 100.0),
            (CellState::UnclassifiedIce, -50.0, 151.0),
        ]);

        expand(&mut grid);
        let report = expand(&mut grid);

        assert!(!report.changed);
        assert_eq!(grid.get(2, 0).unwrap().state(), CellState::UnclassifiedIce);
    }

    #[test]
    fn test_contested_target_transitions_once() {
        // Two cores flank one target; only the right one satisfies continuity
        let mut grid = strip(&[
            (CellState::ConvectionCore, -60.0, 10.0),
            (CellState::UnclassifiedIce, -50.0, 100.0),
            (CellState::ConvectionCore, -60.0, 1000.0),
        ]);

        let report = expand(&mut grid);

        assert_eq!(report.transitions, vec![Position::new(1, 0)]);
        assert_eq!(grid.count(CellState::Anvil), 1);
    }

    #[test]
    fn test_reads_use_start_of_step_snapshot() {
        let grid = strip(&[
            (CellState::ConvectionCore, -60.0, 100.0),
            (CellState::UnclassifiedIce, -50.0, 100.0),
            (CellState::UnclassifiedIce, -50.0, 100.0),
        ]);

        let forward = collect_transitions(&grid, &source_positions(&grid));
        // Cell 2 is reachable only through cell 1, which is not yet anvil
        assert_eq!(forward, vec![Position::new(1, 0)]);
    }

    /// Mirror a grid left-to-right
    fn mirrored(grid: &Grid) -> Grid {
        let width = grid.width();
        Grid::from_fn(width, grid.height(), |p| {
            let cell = grid.cell_at(Position::new(width - 1 - p.x, p.y)).unwrap();
            (cell.state(), cell.temperature(), cell.ice_water_content())
        })
        .unwrap()
    }

    #[test]
    fn test_scan_direction_does_not_matter() {
        // Growth must not depend on which way rows are scanned
        let grid = Grid::from_fn(6, 3, |p| {
            let state = match (p.x, p.y) {
                (0, 0) | (5, 2) | (2, 1) => CellState::ConvectionCore,
                _ => CellState::UnclassifiedIce,
            };
            let iwc = 50.0 + (p.x * 37 + p.y * 11) as f64 % 60.0;
            (state, Celsius::new(-45.0), IceWaterContent::new(iwc))
        })
        .unwrap();

        let (forward, _) = expanded(&grid);
        let (backward, _) = expanded(&mirrored(&grid));

        assert_eq!(mirrored(&backward), forward);
        // Direct neighbors of the cores only; (1, 0) is too dense for (0, 0)
        assert_eq!(forward.count(CellState::Anvil), 7);
        assert_eq!(
            forward.get(1, 0).unwrap().state(),
            CellState::UnclassifiedIce
        );
    }

    #[test]
    fn test_expanded_leaves_input_untouched() {
        let grid = strip(&[
            (CellState::ConvectionCore, -60.0, 1000.0),
            (CellState::UnclassifiedIce, -40.0, 200.0),
        ]);

        let (next, report) = expanded(&grid);

        assert!(report.changed);
        assert_eq!(grid.count(CellState::Anvil), 0);
        assert_eq!(next.count(CellState::Anvil), 1);
    }

    #[test]
    fn test_in_situ_and_clear_do_not_propagate() {
        let mut grid = strip(&[
            (CellState::Clear, -60.0, 0.0),
            (CellState::UnclassifiedIce, -50.0, 0.0),
        ]);

        assert!(!expand(&mut grid).changed);
    }
}
