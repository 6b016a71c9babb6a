//! Cirrus Curtain Classifier Core Library
//!
//! Classifies ice cloud in a 2D vertical curtain (along-track × altitude) into
//! anvil cirrus, detrained from deep convection, and in-situ cirrus, formed
//! where it sits. Anvil classification grows outward from convective cores by
//! region growing under two physical gates:
//!
//! - Homogeneous freezing: the target must be colder than −38 °C
//! - Mass continuity: the target may hold at most 1.5× the ice water content
//!   of the adjacent source it grows from
//!
//! Once growth stalls, cold ice that no core could reach is finalized as
//! in-situ cirrus.
//!
//! ## Layout
//!
//! - [`core_types`]: cells, positions, unit newtypes
//! - [`grid`]: the fixed-size curtain and its 4-neighbor adjacency
//! - [`solver`]: expansion and finalization passes
//! - [`simulation`]: the run driver and statistics

// Core types and utilities
pub mod core_types;

// Curtain storage and adjacency
pub mod grid;

// Classification passes
pub mod solver;

// Run lifecycle
pub mod simulation;

// Re-export core types
pub use core_types::{Cell, CellState, Celsius, IceWaterContent, Position};

// Re-export grid types
pub use grid::{Grid, GridError};

// Re-export solver entry points
pub use solver::{expand, expanded, finalize, ExpansionReport, FinalizationReport};

// Re-export run types
pub use simulation::{
    ClassificationRun, ClassificationStats, CurtainInitializer, FixedCurtain, RunError, RunState,
    StepOutcome,
};
