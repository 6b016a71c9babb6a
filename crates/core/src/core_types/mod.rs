//! Core types and utilities

pub mod cell;
pub mod units;

pub use cell::{Cell, CellState, Position};
pub use units::{Celsius, IceWaterContent};
