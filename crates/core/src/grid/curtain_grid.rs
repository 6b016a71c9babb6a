//! Fixed-size 2D curtain of classification cells
//!
//! The grid is created once by an external initializer and never resized.
//! Cells are stored in row-major order: `[y * width + x]`. Only cell state and
//! the per-step change flag mutate after construction, and only through the
//! solver.

use crate::core_types::{Cell, CellState, Celsius, IceWaterContent, Position};
use crate::grid::neighbors;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rectangular curtain of `width × height` cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

/// Unvalidated wire form of a [`Grid`]
#[derive(Deserialize)]
struct GridData {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl TryFrom<GridData> for Grid {
    type Error = GridError;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        Grid::new(data.width, data.height, data.cells)
    }
}

impl Grid {
    /// Build a grid from cells in row-major order.
    ///
    /// # Errors
    ///
    /// Fails fast on any violation of the construction invariants:
    /// - [`GridError::ZeroDimensions`] if either dimension is zero
    /// - [`GridError::DimensionsOverflow`] if `width * height` overflows
    /// - [`GridError::CellCountMismatch`] if `cells.len() != width * height`
    /// - [`GridError::PositionMismatch`] if a cell's position does not match its slot
    /// - [`GridError::ClassifiedAtConstruction`] if a cell is already Anvil or `InSitu`
    /// - [`GridError::InvalidTemperature`] / [`GridError::InvalidIceWaterContent`]
    ///   for non-finite or unphysical values
    pub fn new(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self, GridError> {
        let expected = checked_cell_count(width, height)?;
        if cells.len() != expected {
            return Err(GridError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }

        for (index, cell) in cells.iter().enumerate() {
            let slot = Position::new(index % width, index / width);
            validate_cell(slot, cell)?;
        }

        let mut grid = Self {
            width,
            height,
            cells,
        };
        grid.clear_change_flags();
        Ok(grid)
    }

    /// Build a grid by evaluating `profile` at every position (row-major).
    ///
    /// # Errors
    ///
    /// Same as [`Grid::new`].
    pub fn from_fn<F>(width: usize, height: usize, mut profile: F) -> Result<Self, GridError>
    where
        F: FnMut(Position) -> (CellState, Celsius, IceWaterContent),
    {
        let total = checked_cell_count(width, height)?;
        let mut cells = Vec::with_capacity(total);
        for y in 0..height {
            for x in 0..width {
                let position = Position::new(x, y);
                let (state, temperature, iwc) = profile(position);
                cells.push(Cell::new(position, state, temperature, iwc));
            }
        }
        Self::new(width, height, cells)
    }

    /// Number of columns
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells (`width * height`)
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Get cell index for a position, if in bounds
    #[inline]
    pub fn cell_index(&self, pos: Position) -> Option<usize> {
        (pos.x < self.width && pos.y < self.height).then(|| pos.y * self.width + pos.x)
    }

    /// Get cell at grid coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] when `(x, y)` lies outside
    /// `[0, width) × [0, height)`. Coordinates are never clamped.
    pub fn get(&self, x: usize, y: usize) -> Result<&Cell, GridError> {
        self.cell_at(Position::new(x, y))
            .ok_or(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
    }

    /// Get cell at a position (bounds-checked)
    #[inline]
    pub fn cell_at(&self, pos: Position) -> Option<&Cell> {
        self.cell_index(pos).map(|idx| &self.cells[idx])
    }

    #[inline]
    pub(crate) fn cell_at_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.cell_index(pos).map(move |idx| &mut self.cells[idx])
    }

    /// All cells in row-major order
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Every position in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    /// In-bounds 4-neighbors of `pos` in traversal order
    #[inline]
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> {
        neighbors(pos, self.width, self.height)
    }

    /// Number of cells currently in `state`
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state == state).count()
    }

    /// Positions whose state changed during the last step
    pub fn changed_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .filter(|c| c.just_changed)
            .map(|c| c.position)
    }

    /// Reset every `just_changed` flag (start of each step)
    pub(crate) fn clear_change_flags(&mut self) {
        for cell in &mut self.cells {
            cell.just_changed = false;
        }
    }
}

fn checked_cell_count(width: usize, height: usize) -> Result<usize, GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::ZeroDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(GridError::DimensionsOverflow { width, height })
}

fn validate_cell(slot: Position, cell: &Cell) -> Result<(), GridError> {
    if cell.position != slot {
        return Err(GridError::PositionMismatch {
            expected: slot,
            found: cell.position,
        });
    }
    if !cell.state.is_initial() {
        return Err(GridError::ClassifiedAtConstruction {
            position: slot,
            state: cell.state,
        });
    }
    if !cell.temperature.is_physical() {
        return Err(GridError::InvalidTemperature {
            position: slot,
            value: cell.temperature.value(),
        });
    }
    if !cell.ice_water_content.is_physical() {
        return Err(GridError::InvalidIceWaterContent {
            position: slot,
            value: cell.ice_water_content.value(),
        });
    }
    Ok(())
}

/// Errors from grid construction and coordinate access
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Width or height is zero
    ZeroDimensions { width: usize, height: usize },
    /// `width * height` does not fit in `usize`
    DimensionsOverflow { width: usize, height: usize },
    /// Number of supplied cells differs from `width * height`
    CellCountMismatch { expected: usize, actual: usize },
    /// A cell's stored position does not match its row-major slot
    PositionMismatch { expected: Position, found: Position },
    /// Anvil or `InSitu` supplied by the initializer
    ClassifiedAtConstruction { position: Position, state: CellState },
    /// Temperature not finite or below absolute zero
    InvalidTemperature { position: Position, value: f64 },
    /// Ice water content not finite or negative
    InvalidIceWaterContent { position: Position, value: f64 },
    /// Coordinate outside the grid
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::ZeroDimensions { width, height } => {
                write!(f, "Invalid grid dimensions {width}x{height}")
            }
            GridError::DimensionsOverflow { width, height } => {
                write!(f, "Grid dimensions {width}x{height} overflow the cell count")
            }
            GridError::CellCountMismatch { expected, actual } => {
                write!(f, "Expected {expected} cells, got {actual}")
            }
            GridError::PositionMismatch { expected, found } => {
                write!(f, "Cell at slot {expected} claims position {found}")
            }
            GridError::ClassifiedAtConstruction { position, state } => {
                write!(f, "Cell {position} is already '{state}' at construction")
            }
            GridError::InvalidTemperature { position, value } => {
                write!(f, "Cell {position} has invalid temperature {value}")
            }
            GridError::InvalidIceWaterContent { position, value } => {
                write!(f, "Cell {position} has invalid ice water content {value}")
            }
            GridError::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "Coordinate ({x}, {y}) out of bounds for {width}x{height} grid"
            ),
        }
    }
}

impl std::error::Error for GridError {}
