//! Physical gates on anvil growth
//!
//! Both thresholds are fixed constants of the classification scheme:
//! - Homogeneous freezing: ice can only exist without a nucleus below −38 °C
//! - Mass continuity: a connected parcel cannot hold more than 1.5× the ice of
//!   the parcel it grew from

use crate::core_types::{Cell, CellState, Celsius};

/// Temperature gate (strict: a cell at exactly −38 °C does not qualify)
pub const HOMOGENEOUS_FREEZING: Celsius = Celsius::HOMOGENEOUS_FREEZING;

/// Maximum IWC jump between a source and the cell it grows into
pub const IWC_CONTINUITY_FACTOR: f64 = 1.5;

/// `target.temperature < −38 °C`
#[inline]
pub fn satisfies_temperature(target: &Cell) -> bool {
    target.temperature() < HOMOGENEOUS_FREEZING
}

/// `target.iwc ≤ source.iwc × 1.5`
#[inline]
pub fn satisfies_continuity(source: &Cell, target: &Cell) -> bool {
    target.ice_water_content().value()
        <= source.ice_water_content().value() * IWC_CONTINUITY_FACTOR
}

/// Whether `source` can claim `target` as anvil in the current step.
///
/// The predicate depends only on the (source, target) pair, so a target with
/// several adjacent sources transitions if any one of them qualifies.
#[inline]
pub fn can_grow_into(source: &Cell, target: &Cell) -> bool {
    source.state().is_source()
        && target.state() == CellState::UnclassifiedIce
        && satisfies_temperature(target)
        && satisfies_continuity(source, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{IceWaterContent, Position};

    fn cell(state: CellState, temp: f64, iwc: f64) -> Cell {
        Cell::new(
            Position::new(0, 0),
            state,
            Celsius::new(temp),
            IceWaterContent::new(iwc),
        )
    }

    #[test]
    fn test_temperature_gate_is_strict() {
        assert!(satisfies_temperature(&cell(
            CellState::UnclassifiedIce,
            -38.0001,
            1.0
        )));
        assert!(!satisfies_temperature(&cell(
            CellState::UnclassifiedIce,
            -38.0,
            1.0
        )));
        assert!(!satisfies_temperature(&cell(
            CellState::UnclassifiedIce,
            -30.0,
            1.0
        )));
    }

    #[test]
    fn test_continuity_gate_is_inclusive() {
        let source = cell(CellState::ConvectionCore, -60.0, 1000.0);
        assert!(satisfies_continuity(
            &source,
            &cell(CellState::UnclassifiedIce, -50.0, 1500.0)
        ));
        assert!(!satisfies_continuity(
            &source,
            &cell(CellState::UnclassifiedIce, -50.0, 1500.1)
        ));
    }

    #[test]
    fn test_continuity_treats_signed_zero_as_zero() {
        let source = cell(CellState::ConvectionCore, -60.0, -0.0);
        let target = cell(CellState::UnclassifiedIce, -50.0, 0.0);
        assert!(satisfies_continuity(&source, &target));
        assert!(can_grow_into(&source, &target));

        let source = cell(CellState::ConvectionCore, -60.0, 0.0);
        let target = cell(CellState::UnclassifiedIce, -50.0, -0.0);
        assert!(satisfies_continuity(&source, &target));
    }

    #[test]
    fn test_can_grow_into_requires_roles() {
        let core = cell(CellState::ConvectionCore, -60.0, 1000.0);
        let anvil = cell(CellState::Anvil, -45.0, 300.0);
        let insitu = cell(CellState::InSitu, -45.0, 300.0);
        let target = cell(CellState::UnclassifiedIce, -40.0, 200.0);

        assert!(can_grow_into(&core, &target));
        assert!(can_grow_into(&anvil, &target));
        assert!(!can_grow_into(&insitu, &target));

        let clear = cell(CellState::Clear, -40.0, 0.0);
        assert!(!can_grow_into(&core, &clear));
    }

    #[test]
    fn test_core_reaches_cold_ice_only() {
        let core = cell(CellState::ConvectionCore, -60.0, 1000.0);
        let cold = cell(CellState::UnclassifiedIce, -40.0, 200.0);
        let warm = cell(CellState::UnclassifiedIce, -30.0, 400.0);

        assert!(can_grow_into(&core, &cold));
        assert!(!can_grow_into(&core, &warm));
    }
}
