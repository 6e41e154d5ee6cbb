/// Reservoir state carried between balance steps.
///
/// - `volume`: stored volume after the overflow clip [m³]
/// - `cum_overflow`: volume spilled since t = 0 [m³]
/// - `cum_turbined`: volume released through the turbines since t = 0 [m³]
///
/// Each scenario run starts from a fresh `State`; nothing is shared between
/// runs.
use super::constants::VOLUME_UNIT_M3;
use crate::curves::{CurveLookup, ReservoirCurve};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub volume: f64,
    pub cum_overflow: f64,
    pub cum_turbined: f64,
}

impl State {
    /// State at t = 0 holding `initial_volume` [m³].
    pub fn initialize(initial_volume: f64) -> Self {
        Self {
            volume: initial_volume,
            cum_overflow: 0.0,
            cum_turbined: 0.0,
        }
    }
}

/// Starting volume [m³] for an initial water elevation, from the cubic
/// level -> volume fit, rounded to whole m³. Flagged as extrapolated when
/// the elevation lies outside the table.
pub fn initial_volume(curve: &ReservoirCurve, water_elevation: f64) -> CurveLookup {
    let lookup = curve.volume_lookup(water_elevation);
    CurveLookup {
        value: (lookup.value * VOLUME_UNIT_M3).round(),
        ..lookup
    }
}
