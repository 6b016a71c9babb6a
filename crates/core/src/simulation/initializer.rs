//! Source of fresh curtains for a classification run
//!
//! The classifier does not decide how a curtain is populated. Whatever builds
//! the starting grid (retrieval ingest, synthetic generator, C caller) sits
//! behind [`CurtainInitializer`] and is asked again on every reset.

use crate::grid::{Grid, GridError};

/// Supplies a freshly constructed, validated [`Grid`]
pub trait CurtainInitializer: Send + Sync {
    /// Build a new starting grid.
    ///
    /// # Errors
    ///
    /// Returns the [`GridError`] raised while constructing the grid.
    fn build(&mut self) -> Result<Grid, GridError>;
}

/// Replays the same curtain on every reset
#[derive(Debug, Clone)]
pub struct FixedCurtain {
    grid: Grid,
}

impl FixedCurtain {
    pub fn new(mut grid: Grid) -> Self {
        grid.clear_change_flags();
        Self { grid }
    }

    /// The curtain handed out on each build
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

impl CurtainInitializer for FixedCurtain {
    fn build(&mut self) -> Result<Grid, GridError> {
        Ok(self.grid.clone())
    }
}

impl<F> CurtainInitializer for F
where
    F: FnMut() -> Result<Grid, GridError> + Send + Sync,
{
    fn build(&mut self) -> Result<Grid, GridError> {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{CellState, Celsius, IceWaterContent};

    fn curtain() -> Grid {
        Grid::from_fn(2, 2, |_| {
            (
                CellState::UnclassifiedIce,
                Celsius::new(-45.0),
                IceWaterContent::new(10.0),
            )
        })
        .unwrap()
    }

    #[test]
    fn test_fixed_curtain_replays() {
        let mut source = FixedCurtain::new(curtain());
        let first = source.build().unwrap();
        let second = source.build().unwrap();
        assert_eq!(first, second);
        assert_eq!(&first, source.grid());
    }

    #[test]
    fn test_closure_initializer() {
        let mut calls = 0;
        let mut source = move || {
            calls += 1;
            if calls > 1 {
                Grid::new(0, 0, Vec::new())
            } else {
                Ok(curtain())
            }
        };

        assert!(source.build().is_ok());
        assert_eq!(
            source.build(),
            Err(GridError::ZeroDimensions {
                width: 0,
                height: 0
            })
        );
    }
}
