//! Turbine operating scenarios.
//!
//! Three fixed release rules, selected by scenario identifier 1-3.

use std::fmt;

use chrono::{NaiveDateTime, Timelike};

use crate::config::TurbineConfig;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// 1: turbines off.
    ZeroRelease,
    /// 2: turbines at maximum discharge around the clock.
    MaxRelease,
    /// 3: ordinary discharge inside the daily window, off outside it.
    ScheduledRelease,
}

impl Scenario {
    /// All scenarios, in identifier order.
    pub const ALL: [Scenario; 3] = [
        Scenario::ZeroRelease,
        Scenario::MaxRelease,
        Scenario::ScheduledRelease,
    ];

    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            1 => Ok(Scenario::ZeroRelease),
            2 => Ok(Scenario::MaxRelease),
            3 => Ok(Scenario::ScheduledRelease),
            other => Err(Error::UnknownScenario(other)),
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Scenario::ZeroRelease => 1,
            Scenario::MaxRelease => 2,
            Scenario::ScheduledRelease => 3,
        }
    }

    /// Short tag used in output column headers.
    pub fn label(self) -> &'static str {
        match self {
            Scenario::ZeroRelease => "T_0",
            Scenario::MaxRelease => "T_MAX",
            Scenario::ScheduledRelease => "T_ORD",
        }
    }

    /// Turbine discharge [m³/s] at `timestamp`.
    ///
    /// The scheduled rule compares the hour of day only, so every day uses
    /// the same `[start, end)` window.
    pub fn release(self, turbine: &TurbineConfig, timestamp: NaiveDateTime) -> f64 {
        match self {
            Scenario::ZeroRelease => 0.0,
            Scenario::MaxRelease => turbine.max_flow,
            Scenario::ScheduledRelease => {
                let hour = timestamp.hour();
                if hour >= turbine.schedule_start_hour && hour < turbine.schedule_end_hour {
                    turbine.ordinary_flow
                } else {
                    0.0
                }
            }
        }
    }
}

impl TryFrom<u8> for Scenario {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self> {
        Scenario::from_id(id)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id(), self.label())
    }
}

/// Turbine discharge for a raw scenario identifier.
pub fn release(scenario_id: u8, turbine: &TurbineConfig, timestamp: NaiveDateTime) -> Result<f64> {
    Ok(Scenario::from_id(scenario_id)?.release(turbine, timestamp))
}

/// Label for a raw scenario identifier.
pub fn scenario_label(scenario_id: u8) -> Result<&'static str> {
    Ok(Scenario::from_id(scenario_id)?.label())
}
