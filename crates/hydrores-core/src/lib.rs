//! hydrores: storm inflow and reservoir water balance under turbine scenarios.
//!
//! A design storm is turned into an hourly inflow hydrograph (SCS-CN losses,
//! Ventura time of concentration, linear-reservoir response), which then
//! drives an hourly reservoir balance for each turbine operating scenario.
pub mod config;
pub mod curves;
pub mod error;
pub mod reservoir;
pub mod runoff;
pub mod simulation;
pub mod turbine;

pub use config::Config;
pub use curves::{CurveLookup, HypsometricCurve, ReservoirCurve};
pub use error::{Error, Result};
pub use runoff::{Hydrograph, HydrographSample, RunoffResponse, RunoffSummary};
pub use simulation::{ComparisonTable, Simulation};
pub use turbine::Scenario;
