//! Semantic unit types for the static atmospheric profile of a curtain
//!
//! Newtype wrappers keep temperature and ice water content from being mixed up
//! when they travel through the classifier and across the FFI boundary.
//!
//! # Design Philosophy
//! - Both quantities use f64; curtain profiles come from retrievals that are
//!   already double precision
//! - Total ordering via `Ord` (NaN sorts above all values)
//! - Serde support for serialization
//! - Construction is unchecked; physical validity is enforced once, when a
//!   [`Grid`](crate::grid::Grid) is built
//!
//! # Usage
//! ```
//! use cirrus_core::core_types::units::{Celsius, IceWaterContent};
//!
//! let t = Celsius::new(-45.0);
//! assert!(t < Celsius::HOMOGENEOUS_FREEZING);
//!
//! let iwc = IceWaterContent::new(200.0);
//! assert_eq!(*iwc.scaled(1.5), 300.0);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

// ============================================================================
// TEMPERATURE
// ============================================================================

/// Air temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Celsius(f64);

impl Eq for Celsius {}

impl PartialOrd for Celsius {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Celsius {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Celsius {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Celsius {
    /// Absolute zero in Celsius
    pub const ABSOLUTE_ZERO: Celsius = Celsius(-273.15);

    /// Homogeneous ice nucleation temperature.
    /// Below this, supercooled liquid freezes without a nucleus.
    pub const HOMOGENEOUS_FREEZING: Celsius = Celsius(-38.0);

    /// Create a new Celsius temperature
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Celsius(value)
    }

    /// Raw value in °C
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Finite and not below absolute zero
    #[inline]
    #[must_use]
    pub fn is_physical(self) -> bool {
        self.0.is_finite() && self.0 >= Self::ABSOLUTE_ZERO.0
    }
}

impl From<f64> for Celsius {
    fn from(v: f64) -> Self {
        Celsius(v)
    }
}

impl From<f32> for Celsius {
    fn from(v: f32) -> Self {
        Celsius(f64::from(v))
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}

// ============================================================================
// ICE WATER CONTENT
// ============================================================================

/// Ice water content (mass of ice per unit volume, mg/m³)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct IceWaterContent(f64);

impl Eq for IceWaterContent {}

impl PartialOrd for IceWaterContent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IceWaterContent {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for IceWaterContent {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl IceWaterContent {
    /// No ice
    pub const ZERO: IceWaterContent = IceWaterContent(0.0);

    /// Create a new ice water content value
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        IceWaterContent(value)
    }

    /// Raw value in mg/m³
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Multiply by a dimensionless factor
    #[inline]
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        IceWaterContent(self.0 * factor)
    }

    /// Finite and non-negative
    #[inline]
    #[must_use]
    pub fn is_physical(self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }
}

impl From<f64> for IceWaterContent {
    fn from(v: f64) -> Self {
        IceWaterContent(v)
    }
}

impl From<f32> for IceWaterContent {
    fn from(v: f32) -> Self {
        IceWaterContent(f64::from(v))
    }
}

impl fmt::Display for IceWaterContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} mg/m³", self.0)
    }
}
