/// Reservoir elevation-volume curve.
///
/// The two directions are derived independently from the same table:
/// - volume -> level: piecewise-linear with linear extrapolation
/// - level -> volume: cubic least-squares fit
///
/// They do not invert each other exactly. `volume_from_level(level_from_volume(v))`
/// differs from `v` by the fit residual; both methods are kept as they are.
use super::interpolate::{CurveLookup, LinearInterpolator, Polynomial};
use crate::error::{Error, Result};

/// Degree of the level -> volume fit.
pub const INVERSE_FIT_DEGREE: usize = 3;

/// Table volumes are in 10^6 m³.
pub const VOLUME_UNIT_M3: f64 = 1e6;

#[derive(Debug, Clone)]
pub struct ReservoirCurve {
    level_of_volume: LinearInterpolator,
    volume_of_level: Polynomial,
}

impl ReservoirCurve {
    /// Build from parallel `Elevation` [m a.s.l.] and `Volume` [10^6 m³]
    /// columns. Both must be strictly increasing, with at least
    /// `INVERSE_FIT_DEGREE + 1` rows.
    pub fn new(elevations: Vec<f64>, volumes: Vec<f64>) -> Result<Self> {
        if elevations.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::InvalidCurve(
                "reservoir elevations must be strictly increasing".to_string(),
            ));
        }
        let level_of_volume = LinearInterpolator::new(volumes.clone(), elevations.clone())?;
        let volume_of_level = Polynomial::fit(&elevations, &volumes, INVERSE_FIT_DEGREE)?;
        Ok(Self {
            level_of_volume,
            volume_of_level,
        })
    }

    /// Water level [m a.s.l.] for a stored volume [10^6 m³].
    pub fn level_from_volume(&self, volume: f64) -> f64 {
        self.level_of_volume.evaluate(volume)
    }

    /// Same as [`Self::level_from_volume`], flagging volumes outside the table.
    pub fn level_lookup(&self, volume: f64) -> CurveLookup {
        self.level_of_volume.lookup(volume)
    }

    /// Stored volume [10^6 m³] at a water level, from the cubic fit.
    pub fn volume_from_level(&self, elevation: f64) -> f64 {
        self.volume_of_level.evaluate(elevation)
    }

    /// Same as [`Self::volume_from_level`], flagging levels outside the table.
    pub fn volume_lookup(&self, elevation: f64) -> CurveLookup {
        self.volume_of_level.lookup(elevation)
    }
}
