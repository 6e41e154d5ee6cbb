//! Event rainfall-runoff transform.
//!
//! SCS-CN effective precipitation, Ventura time of concentration and a
//! single linear-reservoir response turning one storm into an hourly
//! inflow hydrograph.
pub mod constants;
pub mod hydrograph;
pub mod processes;
pub mod run;

pub use hydrograph::{Hydrograph, HydrographSample, RunoffResponse, RunoffSummary};
pub use run::{discharge_series, Catchment};
