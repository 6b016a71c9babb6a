//! Curtain cell record and classification states

use super::units::{Celsius, IceWaterContent};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer grid coordinates of a cell.
///
/// `x` runs along the curtain (column), `y` runs through the profile (row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    #[inline]
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Classification state of a single cell
///
/// Transitions are one-way: `UnclassifiedIce` becomes `Anvil` or `InSitu`,
/// everything else is fixed for the lifetime of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellState {
    /// No ice present
    Clear = 0,
    /// Deep-convective core, the seed of anvil growth
    ConvectionCore = 1,
    /// Ice not (yet) attributed to either cirrus type
    UnclassifiedIce = 2,
    /// Anvil cirrus, connected to a core by physical continuity
    Anvil = 3,
    /// In-situ cirrus, formed independently of any core
    InSitu = 4,
}

impl CellState {
    /// Every state, in discriminant order
    pub const ALL: [CellState; 5] = [
        CellState::Clear,
        CellState::ConvectionCore,
        CellState::UnclassifiedIce,
        CellState::Anvil,
        CellState::InSitu,
    ];

    /// Cells that can propagate anvil classification to their neighbors
    #[inline]
    #[must_use]
    pub const fn is_source(self) -> bool {
        matches!(self, CellState::ConvectionCore | CellState::Anvil)
    }

    /// States an initializer may place in a freshly constructed grid
    #[inline]
    #[must_use]
    pub const fn is_initial(self) -> bool {
        matches!(
            self,
            CellState::Clear | CellState::ConvectionCore | CellState::UnclassifiedIce
        )
    }

    /// States produced by classification
    #[inline]
    #[must_use]
    pub const fn is_classified(self) -> bool {
        matches!(self, CellState::Anvil | CellState::InSitu)
    }

    /// Stable numeric code (matches the `#[repr(u8)]` discriminant)
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`CellState::code`]
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CellState::Clear),
            1 => Some(CellState::ConvectionCore),
            2 => Some(CellState::UnclassifiedIce),
            3 => Some(CellState::Anvil),
            4 => Some(CellState::InSitu),
            _ => None,
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            CellState::Clear => "clear",
            CellState::ConvectionCore => "convection core",
            CellState::UnclassifiedIce => "unclassified ice",
            CellState::Anvil => "anvil cirrus",
            CellState::InSitu => "in-situ cirrus",
        }
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One location of the curtain
///
/// Position, temperature and ice water content are fixed at construction;
/// only `state` and `just_changed` are mutated, and only by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) position: Position,
    pub(crate) state: CellState,
    pub(crate) temperature: Celsius,
    pub(crate) ice_water_content: IceWaterContent,
    /// Set only during the iteration in which `state` changed
    #[serde(default)]
    pub(crate) just_changed: bool,
}

impl Cell {
    /// Create a cell for an initial grid.
    ///
    /// Validity (initial state, physical values) is checked when the cell is
    /// handed to [`Grid::new`](crate::grid::Grid::new).
    pub fn new(
        position: Position,
        state: CellState,
        temperature: Celsius,
        ice_water_content: IceWaterContent,
    ) -> Self {
        Self {
            position,
            state,
            temperature,
            ice_water_content,
            just_changed: false,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    /// Air temperature (°C)
    pub fn temperature(&self) -> Celsius {
        self.temperature
    }

    /// Ice water content (mg/m³)
    pub fn ice_water_content(&self) -> IceWaterContent {
        self.ice_water_content
    }

    /// True only for the step that changed this cell's state
    pub fn just_changed(&self) -> bool {
        self.just_changed
    }

    /// Apply a classification transition and flag it for the presentation layer
    #[inline]
    pub(crate) fn transition(&mut self, state: CellState) {
        debug_assert_eq!(self.state, CellState::UnclassifiedIce);
        self.state = state;
        self.just_changed = true;
    }
}
