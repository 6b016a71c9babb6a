//! Region-growing classification solver
//!
//! The solver is a pair of pure state transitions over a [`Grid`](crate::grid::Grid):
//!
//! 1. [`expand`] grows anvil cirrus outward from convection cores by one
//!    4-connected ring per call, gated by [`constraints`]
//! 2. [`finalize`] runs once growth stalls and turns the remaining cold
//!    unclassified ice into in-situ cirrus
//!
//! Both stage every transition against the start-of-step snapshot before
//! writing, so results are independent of traversal order.
//!
//! # Example
//!
//! ```rust
//! use cirrus_core::core_types::{CellState, Celsius, IceWaterContent};
//! use cirrus_core::grid::Grid;
//! use cirrus_core::solver::{expand, finalize};
//!
//! let profile = [
//!     (CellState::ConvectionCore, -60.0, 1000.0),
//!     (CellState::UnclassifiedIce, -40.0, 200.0),
//!     (CellState::UnclassifiedIce, -30.0, 400.0),
//! ];
//! let mut grid = Grid::from_fn(3, 1, |p| {
//!     let (state, t, iwc) = profile[p.x];
//!     (state, Celsius::new(t), IceWaterContent::new(iwc))
//! })
//! .unwrap();
//!
//! while expand(&mut grid).changed {}
//! finalize(&mut grid);
//! assert_eq!(grid.get(1, 0).unwrap().state(), CellState::Anvil);
//! assert_eq!(grid.get(2, 0).unwrap().state(), CellState::UnclassifiedIce);
//! ```

pub mod constraints;
mod expansion;
mod finalization;

// Re-exports
pub use constraints::{
    can_grow_into, satisfies_continuity, satisfies_temperature, HOMOGENEOUS_FREEZING,
    IWC_CONTINUITY_FACTOR,
};
pub use expansion::{expand, expanded, ExpansionReport};
pub use finalization::{finalize, FinalizationReport};
