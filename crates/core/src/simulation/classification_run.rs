//! Iteration driver for a curtain classification
//!
//! `ClassificationRun` owns the grid and walks the `Idle → Running → Converged`
//! state machine: one expansion step per [`ClassificationRun::step`], then a
//! single finalization sweep on the step where growth stalls. Pacing belongs
//! to the caller; the driver never blocks.

use super::initializer::{CurtainInitializer, FixedCurtain};
use super::stats::ClassificationStats;
use crate::core_types::Position;
use crate::grid::{Grid, GridError};
use crate::solver::{expand, finalize, FinalizationReport};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Driver lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RunState {
    /// Not iterating (fresh or paused)
    Idle = 0,
    /// Expansion steps are being taken
    Running = 1,
    /// Growth stalled and finalization ran; terminal until reset
    Converged = 2,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Converged => "converged",
        };
        f.write_str(label)
    }
}

/// What a single driver step did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Iteration counter after this step (1 for the first step)
    pub iteration: usize,
    /// The expansion step grew the anvil
    pub changed: bool,
    /// Present only on the step that converged
    pub finalization: Option<FinalizationReport>,
    /// Driver state after this step
    pub state: RunState,
}

/// Classification run over one curtain
///
/// # Example
///
/// ```rust
/// use cirrus_core::core_types::{CellState, Celsius, IceWaterContent};
/// use cirrus_core::grid::Grid;
/// use cirrus_core::simulation::{ClassificationRun, RunState};
///
/// let profile = [
///     (CellState::ConvectionCore, -60.0, 1000.0),
///     (CellState::UnclassifiedIce, -40.0, 200.0),
///     (CellState::UnclassifiedIce, -30.0, 400.0),
/// ];
/// let grid = Grid::from_fn(3, 1, |p| {
///     let (state, t, iwc) = profile[p.x];
///     (state, Celsius::new(t), IceWaterContent::new(iwc))
/// })
/// .unwrap();
///
/// let mut run = ClassificationRun::from_grid(grid);
/// run.run_to_convergence().unwrap();
///
/// assert_eq!(run.state(), RunState::Converged);
/// assert_eq!(run.iteration(), 2);
/// assert_eq!(run.stats().anvil, 1);
/// ```
pub struct ClassificationRun {
    /// External source of fresh curtains, asked again on reset
    initializer: Box<dyn CurtainInitializer>,

    grid: Grid,
    state: RunState,
    iteration: usize,

    /// Positions that changed on the most recent step (presentation side channel)
    last_transitions: Vec<Position>,
}

impl ClassificationRun {
    /// Create a run from an initializer, building the first curtain.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Initializer`] if the initializer cannot build a
    /// valid grid.
    pub fn new(mut initializer: Box<dyn CurtainInitializer>) -> Result<Self, RunError> {
        let grid = initializer.build()?;

        info!(
            "Classification run initialized: {}x{} curtain ({})",
            grid.width(),
            grid.height(),
            ClassificationStats::from_grid(&grid)
        );

        Ok(Self {
            initializer,
            grid,
            state: RunState::Idle,
            iteration: 0,
            last_transitions: Vec::new(),
        })
    }

    /// Create a run over a fixed curtain; reset restores this same grid.
    pub fn from_grid(grid: Grid) -> Self {
        let initializer = FixedCurtain::new(grid);
        let grid = initializer.grid().clone();

        info!(
            "Classification run initialized: {}x{} curtain ({})",
            grid.width(),
            grid.height(),
            ClassificationStats::from_grid(&grid)
        );

        Self {
            initializer: Box::new(initializer),
            grid,
            state: RunState::Idle,
            iteration: 0,
            last_transitions: Vec::new(),
        }
    }

    // ====== Control surface ======

    /// `Idle → Running`. A no-op while already running.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::AlreadyConverged`] once the run has converged;
    /// only [`reset`](Self::reset) leaves that state.
    pub fn start(&mut self) -> Result<(), RunError> {
        match self.state {
            RunState::Idle => {
                info!("Classification started at iteration {}", self.iteration);
                self.state = RunState::Running;
                Ok(())
            }
            RunState::Running => Ok(()),
            RunState::Converged => {
                warn!("Start requested on a converged run; reset first");
                Err(RunError::AlreadyConverged)
            }
        }
    }

    /// `Running → Idle`, keeping grid and counter. A no-op otherwise.
    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            info!("Classification paused at iteration {}", self.iteration);
            self.state = RunState::Idle;
        } else {
            debug!("Pause ignored in state {}", self.state);
        }
    }

    /// Discard the grid, request a fresh one, and return to `Idle` at iteration 0.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Initializer`] if the new grid cannot be built; the
    /// run is left untouched in that case.
    pub fn reset(&mut self) -> Result<(), RunError> {
        let grid = self.initializer.build()?;

        info!(
            "Classification reset after {} iterations ({})",
            self.iteration,
            self.stats()
        );

        self.grid = grid;
        self.state = RunState::Idle;
        self.iteration = 0;
        self.last_transitions.clear();
        Ok(())
    }

    // ====== Iteration ======

    /// Take one expansion step; on the step that stalls, finalize and converge.
    ///
    /// # Errors
    ///
    /// - [`RunError::NotRunning`] while idle
    /// - [`RunError::AlreadyConverged`] after convergence
    /// - [`RunError::IterationLimit`] if the run exceeds `width * height + 1`
    ///   steps, which a valid grid cannot reach
    pub fn step(&mut self) -> Result<StepOutcome, RunError> {
        match self.state {
            RunState::Idle => {
                warn!("Step requested while idle; start the run first");
                return Err(RunError::NotRunning);
            }
            RunState::Converged => {
                warn!("Step requested on a converged run; reset first");
                return Err(RunError::AlreadyConverged);
            }
            RunState::Running => {}
        }

        let limit = self.iteration_limit();
        if self.iteration >= limit {
            warn!("Iteration limit of {} reached without converging", limit);
            return Err(RunError::IterationLimit { limit });
        }

        self.iteration += 1;
        let expansion = expand(&mut self.grid);

        if expansion.changed {
            debug!(
                "Iteration {}: {} new anvil cells ({})",
                self.iteration,
                expansion.transitions.len(),
                self.stats()
            );
            self.last_transitions = expansion.transitions;

            return Ok(StepOutcome {
                iteration: self.iteration,
                changed: true,
                finalization: None,
                state: self.state,
            });
        }

        let finalization = finalize(&mut self.grid);
        self.last_transitions.clone_from(&finalization.transitions);
        self.state = RunState::Converged;

        info!(
            "Classification converged after {} iterations, {} in-situ cells finalized ({})",
            self.iteration,
            finalization.transitions.len(),
            self.stats()
        );

        Ok(StepOutcome {
            iteration: self.iteration,
            changed: false,
            finalization: Some(finalization),
            state: self.state,
        })
    }

    /// Start (if idle) and step until converged.
    ///
    /// # Errors
    ///
    /// Same as [`start`](Self::start) and [`step`](Self::step).
    pub fn run_to_convergence(&mut self) -> Result<StepOutcome, RunError> {
        self.start()?;
        loop {
            let outcome = self.step()?;
            if outcome.state == RunState::Converged {
                return Ok(outcome);
            }
        }
    }

    // ====== Presentation view ======

    /// Current grid (read-only)
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of expansion steps taken since the last reset
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_converged(&self) -> bool {
        self.state == RunState::Converged
    }

    /// Per-state counts, recomputed from the grid
    pub fn stats(&self) -> ClassificationStats {
        ClassificationStats::from_grid(&self.grid)
    }

    /// Positions that changed on the most recent step
    pub fn last_transitions(&self) -> &[Position] {
        &self.last_transitions
    }

    /// Upper bound on expansion steps for this grid
    pub fn iteration_limit(&self) -> usize {
        self.grid.cell_count().saturating_add(1)
    }
}

impl fmt::Debug for ClassificationRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassificationRun")
            .field("width", &self.grid.width())
            .field("height", &self.grid.height())
            .field("state", &self.state)
            .field("iteration", &self.iteration)
            .finish_non_exhaustive()
    }
}

/// Errors from driving a classification run
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    /// `step` called while idle
    NotRunning,
    /// `start` or `step` called after convergence
    AlreadyConverged,
    /// More expansion steps than the grid can need
    IterationLimit { limit: usize },
    /// The initializer could not build a valid grid
    Initializer(GridError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::NotRunning => write!(f, "Run is not started"),
            RunError::AlreadyConverged => write!(f, "Run has already converged; reset first"),
            RunError::IterationLimit { limit } => {
                write!(f, "Iteration limit of {limit} exceeded")
            }
            RunError::Initializer(err) => write!(f, "Failed to build curtain: {err}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Initializer(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GridError> for RunError {
    fn from(err: GridError) -> Self {
        RunError::Initializer(err)
    }
}
