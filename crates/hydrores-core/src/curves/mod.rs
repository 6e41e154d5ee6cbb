//! Tabular curves shared by the runoff transform and the reservoir balance.
//!
//! Both curves are immutable once built and safe to share across scenario
//! runs.
pub mod hypsometric;
pub mod interpolate;
pub mod reservoir;

pub use hypsometric::HypsometricCurve;
pub use interpolate::{CurveLookup, LinearInterpolator, Polynomial};
pub use reservoir::ReservoirCurve;
