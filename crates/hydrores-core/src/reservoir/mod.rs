//! Reservoir water balance under a turbine scenario.
//!
//! Hourly mass balance with overflow clipping at maximum storage and water
//! level from the elevation-volume curve.
pub mod constants;
pub mod fluxes;
pub mod run;
pub mod state;

pub use fluxes::{Fluxes, FluxesTimeseries};
pub use run::{step, ScenarioRun};
pub use state::State;
