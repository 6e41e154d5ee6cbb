//! Reservoir balance outputs.
//!
//! `Fluxes` holds a single hourly step at full precision, `FluxesTimeseries`
//! a full scenario run. Column headers and presentation rounding are part of
//! the declaration, so the output schema is fixed here and nowhere else.

/// Single-step balance quantities, returned by `step()`.
#[derive(Debug, Clone, Copy, PartialEq, hydrores_macros::Fluxes)]
pub struct Fluxes {
    #[column(header = "Q_in [m3/s]", decimals = 1)]
    pub inflow: f64,
    #[column(header = "Q_dmv [m3/s]", decimals = 1)]
    pub environmental_flow: f64,
    #[column(header = "Q_t [m3/s]", decimals = 1)]
    pub turbine_flow: f64,
    /// Net inflow minus releases [m³/s].
    #[column(header = "Water balance [m3/s]", decimals = 1)]
    pub balance: f64,
    /// Stored volume after the overflow clip [m³].
    #[column(header = "Reservoir Volume [m3]", decimals = 0)]
    pub volume: f64,
    #[column(header = "Water level [m slm]", decimals = 2)]
    pub water_level: f64,
    /// Volume spilled during this step [m³].
    #[column(header = "Volume loss [m3]", decimals = 0)]
    pub overflow_volume: f64,
    /// Spill averaged over the step [m³/s].
    #[column(header = "Overflow [m3/s]", decimals = 1)]
    pub overflow_rate: f64,
    #[column(header = "Cum Volume loss [m3]", decimals = 0)]
    pub cum_overflow: f64,
    #[column(header = "Cum Volume turb [m3]", decimals = 0)]
    pub cum_turbined: f64,
}
