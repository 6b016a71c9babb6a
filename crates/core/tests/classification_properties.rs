//! Randomized invariants of the expansion and finalization passes
mod common;

use cirrus_core::core_types::{CellState, Celsius, IceWaterContent, Position};
use cirrus_core::grid::Grid;
use cirrus_core::simulation::{ClassificationRun, RunState};
use cirrus_core::solver::{
    can_grow_into, expand, expanded, finalize, satisfies_continuity, satisfies_temperature,
};
use common::states;
use proptest::prelude::*;

fn arb_state() -> impl Strategy<Value = CellState> {
    prop_oneof![
        2 => Just(CellState::Clear),
        1 => Just(CellState::ConvectionCore),
        5 => Just(CellState::UnclassifiedIce),
    ]
}

fn arb_grid() -> impl Strategy<Value = Grid> {
    (1usize..9, 1usize..9).prop_flat_map(|(width, height)| {
        prop::collection::vec(
            (arb_state(), -80.0f64..0.0, 0.0f64..500.0),
            width * height,
        )
        .prop_map(move |profile| {
            Grid::from_fn(width, height, |p| {
                let (state, t, iwc) = profile[p.y * width + p.x];
                (state, Celsius::new(t), IceWaterContent::new(iwc))
            })
            .unwrap()
        })
    })
}

/// Naive single-threaded expansion reading only `grid`
fn reference_step(grid: &Grid) -> Vec<CellState> {
    grid.cells()
        .iter()
        .map(|target| {
            let claimed = grid.neighbors(target.position()).any(|pos| {
                grid.cell_at(pos)
                    .is_some_and(|source| can_grow_into(source, target))
            });
            if claimed {
                CellState::Anvil
            } else {
                target.state()
            }
        })
        .collect()
}

fn converge(grid: &Grid) -> ClassificationRun {
    let mut run = ClassificationRun::from_grid(grid.clone());
    run.run_to_convergence().unwrap();
    run
}

proptest! {
    #[test]
    fn expansion_matches_snapshot_reference(grid in arb_grid()) {
        let mut current = grid;
        loop {
            let expected = reference_step(&current);
            let (next, report) = expanded(&current);
            prop_assert_eq!(states(&next), expected);
            if !report.changed {
                break;
            }
            current = next;
        }
    }

    #[test]
    fn expansion_is_monotonic(grid in arb_grid()) {
        let mut current = grid;
        loop {
            let before = states(&current);
            let report = expand(&mut current);
            for (old, new) in before.iter().zip(states(&current)) {
                if *old != new {
                    prop_assert_eq!(*old, CellState::UnclassifiedIce);
                    prop_assert_eq!(new, CellState::Anvil);
                }
            }
            prop_assert_eq!(
                report.transitions.len(),
                current.changed_positions().count()
            );
            if !report.changed {
                break;
            }
        }
    }

    #[test]
    fn runs_terminate_within_bound(grid in arb_grid()) {
        let unclassified = grid.count(CellState::UnclassifiedIce);
        let run = converge(&grid);

        prop_assert_eq!(run.state(), RunState::Converged);
        prop_assert!(run.iteration() <= unclassified + 1);
        prop_assert!(run.iteration() <= grid.cell_count());
        prop_assert!(run.iteration() <= run.iteration_limit());
    }

    #[test]
    fn every_anvil_cell_has_a_qualifying_source(grid in arb_grid()) {
        let run = converge(&grid);
        let result = run.grid();

        for cell in result.cells().iter().filter(|c| c.state() == CellState::Anvil) {
            prop_assert!(satisfies_temperature(cell));
            let supported = result.neighbors(cell.position()).any(|pos| {
                result.cell_at(pos).is_some_and(|source| {
                    source.state().is_source() && satisfies_continuity(source, cell)
                })
            });
            prop_assert!(supported, "anvil at {} has no source", cell.position());
        }
    }

    #[test]
    fn finalization_leaves_no_cold_unclassified_ice(grid in arb_grid()) {
        let run = converge(&grid);

        for cell in run.grid().cells() {
            if cell.state() == CellState::UnclassifiedIce {
                prop_assert!(!satisfies_temperature(cell));
            }
            if cell.state() == CellState::InSitu {
                prop_assert!(satisfies_temperature(cell));
            }
        }
    }

    #[test]
    fn finalization_is_idempotent(grid in arb_grid()) {
        let mut run = converge(&grid);
        let mut settled = run.grid().clone();

        let again = finalize(&mut settled);
        prop_assert!(!again.progressed);
        prop_assert_eq!(states(&settled), states(run.grid()));

        // A settled grid cannot grow either
        prop_assert!(!expand(&mut settled).changed);

        run.reset().unwrap();
        prop_assert_eq!(run.grid(), &grid);
    }

    #[test]
    fn initial_states_never_change(grid in arb_grid()) {
        let run = converge(&grid);

        for (before, after) in grid.cells().iter().zip(run.grid().cells()) {
            if before.state() != CellState::UnclassifiedIce {
                prop_assert_eq!(before.state(), after.state());
            }
            prop_assert_eq!(before.temperature(), after.temperature());
            prop_assert_eq!(before.ice_water_content(), after.ice_water_content());
        }
        prop_assert_eq!(run.stats().total(), grid.cell_count());
    }

    #[test]
    fn neighbors_stay_in_bounds(width in 1usize..12, height in 1usize..12, x in 0usize..12, y in 0usize..12) {
        let x = x % width;
        let y = y % height;
        let count = cirrus_core::grid::neighbors(Position::new(x, y), width, height)
            .inspect(|p| assert!(p.x < width && p.y < height))
            .count();
        let expected = usize::from(x > 0)
            + usize::from(x + 1 < width)
            + usize::from(y > 0)
            + usize::from(y + 1 < height);
        prop_assert_eq!(count, expected);
    }
}
