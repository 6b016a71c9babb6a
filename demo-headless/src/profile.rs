//! Synthetic curtain generator
//!
//! Builds a plausible retrieval-like curtain: temperature falls with altitude
//! along a constant lapse rate, ice is confined to a cloud band, and dense
//! ice sits in vertical convective columns whose outflow thins with distance.

use cirrus_core::{CellState, Celsius, Grid, GridError, IceWaterContent};
use rand::rngs::StdRng;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct CurtainProfile {
    /// Surface temperature (°C)
    pub surface_temperature: f64,
    /// Temperature drop per km of altitude (°C/km)
    pub lapse_rate: f64,
    /// Altitude above which temperature stays constant (km)
    pub tropopause_km: f64,
    /// Vertical extent of one row (km)
    pub row_depth_km: f64,
    /// Cloud band bottom and top (km)
    pub band_km: (f64, f64),
    /// Chance that a band cell holds ice at all
    pub ice_fraction: f64,
    /// Number of convective columns
    pub cores: usize,
    /// Peak IWC range for core cells (mg/m³)
    pub core_iwc: (f64, f64),
    /// Horizontal e-folding distance of outflow IWC (columns)
    pub outflow_decay_cols: f64,
}

impl Default for CurtainProfile {
    fn default() -> Self {
        Self {
            surface_temperature: 25.0,
            lapse_rate: 6.5,
            tropopause_km: 16.0,
            row_depth_km: 0.4,
            band_km: (6.0, 15.0),
            ice_fraction: 0.85,
            cores: 3,
            core_iwc: (400.0, 1200.0),
            outflow_decay_cols: 12.0,
        }
    }
}

impl CurtainProfile {
    /// Altitude (km) of row `y`; row 0 is the top of the curtain
    fn altitude_km(&self, y: usize, height: usize) -> f64 {
        (height - 1 - y) as f64 * self.row_depth_km
    }

    fn temperature_at(&self, altitude_km: f64) -> f64 {
        self.surface_temperature - self.lapse_rate * altitude_km.min(self.tropopause_km)
    }

    /// Draw a fresh curtain of `width × height` cells.
    ///
    /// # Errors
    ///
    /// Returns the [`GridError`] raised for zero dimensions or an unphysical
    /// profile.
    pub fn generate(
        &self,
        width: usize,
        height: usize,
        rng: &mut StdRng,
    ) -> Result<Grid, GridError> {
        let core_columns: Vec<(usize, f64)> = (0..self.cores.min(width))
            .map(|_| {
                (
                    rng.random_range(0..width.max(1)),
                    rng.random_range(self.core_iwc.0..=self.core_iwc.1),
                )
            })
            .collect();

        Grid::from_fn(width, height, |p| {
            let altitude = self.altitude_km(p.y, height);
            let temperature = Celsius::new(self.temperature_at(altitude));
            let in_band = altitude >= self.band_km.0 && altitude <= self.band_km.1;

            if !in_band {
                return (CellState::Clear, temperature, IceWaterContent::ZERO);
            }

            // Nearest convective column and its peak IWC
            let nearest = core_columns
                .iter()
                .map(|&(x, peak)| (x.abs_diff(p.x), peak))
                .min_by_key(|&(distance, _)| distance);

            if let Some((0, peak)) = nearest {
                let iwc = peak * rng.random_range(0.8..=1.0);
                return (
                    CellState::ConvectionCore,
                    temperature,
                    IceWaterContent::new(iwc),
                );
            }
            if !rng.random_bool(self.ice_fraction) {
                return (CellState::Clear, temperature, IceWaterContent::ZERO);
            }

            let iwc = match nearest {
                Some((distance, peak)) => {
                    let outflow = peak * (-(distance as f64) / self.outflow_decay_cols).exp();
                    (outflow * rng.random_range(0.6..=1.1)).max(rng.random_range(2.0..20.0))
                }
                None => rng.random_range(2.0..60.0),
            };
            (
                CellState::UnclassifiedIce,
                temperature,
                IceWaterContent::new(iwc),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_same_seed_same_curtain() {
        let profile = CurtainProfile::default();
        let a = profile
            .generate(30, 20, &mut StdRng::seed_from_u64(7))
            .unwrap();
        let b = profile
            .generate(30, 20, &mut StdRng::seed_from_u64(7))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_temperature_falls_with_altitude() {
        let profile = CurtainProfile::default();
        let grid = profile
            .generate(4, 40, &mut StdRng::seed_from_u64(1))
            .unwrap();

        let top = grid.get(0, 0).unwrap().temperature();
        let bottom = grid.get(0, 39).unwrap().temperature();
        assert!(top < bottom);
        assert_eq!(bottom.value(), 25.0);
    }

    #[test]
    fn test_no_cores_requested() {
        let profile = CurtainProfile {
            cores: 0,
            ..CurtainProfile::default()
        };
        let grid = profile
            .generate(10, 40, &mut StdRng::seed_from_u64(3))
            .unwrap();
        assert_eq!(grid.count(CellState::ConvectionCore), 0);
    }
}
