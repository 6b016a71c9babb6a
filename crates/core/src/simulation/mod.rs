//! Classification run lifecycle
//!
//! [`ClassificationRun`] drives the solver over a curtain supplied by a
//! [`CurtainInitializer`] and exposes read-only views for presentation.

pub mod classification_run;
pub mod initializer;
pub mod stats;

pub use classification_run::{ClassificationRun, RunError, RunState, StepOutcome};
pub use initializer::{CurtainInitializer, FixedCurtain};
pub use stats::ClassificationStats;
