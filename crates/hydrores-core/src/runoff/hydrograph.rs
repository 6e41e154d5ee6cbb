//! Inflow hydrograph types.
//!
//! `HydrographSample` holds one hourly ordinate, `Hydrograph` the full
//! series (one `Vec` per column). Discharge is kept at full precision; the
//! 0.01 m³/s rounding is applied only when presented.

use hydrores_macros::Fluxes;

#[derive(Debug, Clone, Copy, PartialEq, Fluxes)]
#[fluxes(timeseries_name = "Hydrograph")]
pub struct HydrographSample {
    /// Offset from the start of the event [hours].
    #[column(header = "t [hour]", decimals = 0)]
    pub hour: f64,
    /// Discharge at the basin outlet [m³/s].
    #[column(header = "Q [m3/s]", decimals = 2)]
    pub discharge: f64,
}

impl Hydrograph {
    /// Largest discharge and the hour it occurs at (first occurrence).
    pub fn peak(&self) -> Option<HydrographSample> {
        let mut best: Option<usize> = None;
        for (i, &q) in self.discharge.iter().enumerate() {
            if best.map_or(true, |b| q > self.discharge[b]) {
                best = Some(i);
            }
        }
        best.and_then(|i| self.get(i))
    }

    /// Total runoff volume [m³], integrating hourly ordinates.
    pub fn volume(&self) -> f64 {
        self.discharge.iter().sum::<f64>() * super::constants::SECONDS_PER_HOUR
    }
}

/// Intermediate quantities of the runoff transform, for reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunoffSummary {
    /// Effective precipitation [mm].
    pub effective_precipitation: f64,
    /// Contributing area [km²].
    pub effective_area_km2: f64,
    /// Time of concentration [hours].
    pub time_of_concentration: f64,
    /// Linear-reservoir storage coefficient k [hours].
    pub storage_coefficient: f64,
    /// Peak discharge [m³/s], the start of the recession limb.
    pub peak_discharge: f64,
}

/// Hydrograph together with the quantities that produced it.
#[derive(Debug, Clone)]
pub struct RunoffResponse {
    pub hydrograph: Hydrograph,
    pub summary: RunoffSummary,
}
