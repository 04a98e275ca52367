//! Core simulation types: sensor readings and dashboard status rows.

use std::fmt;

use serde::Serialize;

use super::fault::FaultKind;
use crate::assets::{AssetKind, SensorKey};
use crate::twin::HealthStatus;

/// Latest raw measurement for one sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Terminal voltage (V), rounded to 2 dp.
    pub voltage: f64,
    /// Current draw (A).
    pub load_amps: f64,
}

/// One dashboard row: sensor reading, twin expectation, and verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetStatus {
    /// Sensor key (`grid_<id>` / `home_<id>`).
    pub id: SensorKey,
    /// Asset name, or street address for homes.
    pub name: String,
    /// Home owner; absent for grid assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    /// Measured voltage (V).
    pub real_value: f64,
    /// Twin expectation (V); nominal supply voltage for homes.
    pub expected_value: f64,
    pub health_status: HealthStatus,
    /// Current draw (A), rounded to 2 dp.
    pub load_amps: f64,
    /// Engineering advice, or the IoT advisory for homes.
    pub recommendation: String,
    /// Fault active on this sensor, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<FaultKind>,
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<7} {:<26} | real={:>10.2} V  expected={:>10.2} V  load={:>7.2} A | {:<8}",
            self.id.to_string(),
            self.name,
            self.real_value,
            self.expected_value,
            self.load_amps,
            self.health_status,
        )?;
        if let Some(kind) = self.fault {
            write!(f, " [{kind}]")?;
        }
        Ok(())
    }
}

/// An asset status captured at a given tick of an offline run.
#[derive(Debug, Clone, PartialEq)]
pub struct TickRecord {
    /// Tick index.
    pub tick: usize,
    /// Simulation time (s).
    pub time_s: f64,
    pub status: AssetStatus,
}

/// Rounds to two decimal places, the precision reported on the dashboard.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
