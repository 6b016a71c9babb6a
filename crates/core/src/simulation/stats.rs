//! Per-state cell counts, projected from the grid on demand

use crate::core_types::CellState;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counts of cells in each classification state.
///
/// Always recomputed from a [`Grid`]; never carried as independent state, so
/// the counts cannot drift from the cells and always sum to `width * height`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationStats {
    pub clear: usize,
    pub convection_core: usize,
    pub unclassified_ice: usize,
    pub anvil: usize,
    pub in_situ: usize,
}

impl ClassificationStats {
    /// Count every cell of `grid` by state
    pub fn from_grid(grid: &Grid) -> Self {
        grid.cells()
            .iter()
            .fold(Self::default(), |mut stats, cell| {
                *stats.slot_mut(cell.state()) += 1;
                stats
            })
    }

    fn slot_mut(&mut self, state: CellState) -> &mut usize {
        match state {
            CellState::Clear => &mut self.clear,
            CellState::ConvectionCore => &mut self.convection_core,
            CellState::UnclassifiedIce => &mut self.unclassified_ice,
            CellState::Anvil => &mut self.anvil,
            CellState::InSitu => &mut self.in_situ,
        }
    }

    /// Number of cells in `state`
    pub fn count(&self, state: CellState) -> usize {
        match state {
            CellState::Clear => self.clear,
            CellState::ConvectionCore => self.convection_core,
            CellState::UnclassifiedIce => self.unclassified_ice,
            CellState::Anvil => self.anvil,
            CellState::InSitu => self.in_situ,
        }
    }

    /// Total number of cells
    pub fn total(&self) -> usize {
        CellState::ALL.iter().map(|&s| self.count(s)).sum()
    }

    /// Cells produced by classification (anvil + in-situ)
    pub fn classified(&self) -> usize {
        self.anvil + self.in_situ
    }

    /// Share of all cells in `state` (0-1)
    pub fn fraction(&self, state: CellState) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(state) as f64 / total as f64
    }

    /// Anvil share of all classified cirrus (0-1), 0 when nothing is classified
    pub fn anvil_fraction(&self) -> f64 {
        let classified = self.classified();
        if classified == 0 {
            return 0.0;
        }
        self.anvil as f64 / classified as f64
    }
}

impl fmt::Display for ClassificationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "clear={} core={} unclassified={} anvil={} in-situ={}",
            self.clear, self.convection_core, self.unclassified_ice, self.anvil, self.in_situ
        )
    }
}
