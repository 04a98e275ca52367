//! Physics-based expectation and health classification.

use std::fmt;

use serde::Serialize;

use crate::config::ThresholdConfig;

/// Health of a monitored asset as shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Normal,
    Warning,
    Critical,
}

impl HealthStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Smart-home IoT state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HomeStatus {
    #[serde(rename = "NORMAL")]
    Normal,
    #[serde(rename = "WARNING")]
    Warning,
    #[serde(rename = "PROTECTION ACTIVE")]
    ProtectionActive,
}

impl HomeStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Warning => "WARNING",
            Self::ProtectionActive => "PROTECTION ACTIVE",
        }
    }
}

impl From<HomeStatus> for HealthStatus {
    /// Tripped protection renders red, a wear warning orange.
    fn from(status: HomeStatus) -> Self {
        match status {
            HomeStatus::Normal => Self::Normal,
            HomeStatus::Warning => Self::Warning,
            HomeStatus::ProtectionActive => Self::Critical,
        }
    }
}

impl fmt::Display for HomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

pub const ADVICE_OPTIMAL: &str = "System Optimal. No Action Required.";
pub const ADVICE_OVERLOAD: &str = "Possible Overload. Inspect Transformer Tap Changer.";
pub const ADVICE_LOAD_REJECTION: &str = "Load Rejection. Check for Capacitor Bank malfunction.";
pub const ADVICE_ANOMALY: &str = "Anomaly Detected. Manual Inspection Required.";
pub const ADVICE_SURGE: &str = "Surge Detected. Power Cut to Save Appliances.";
pub const ADVICE_HIGH_CURRENT: &str = "High Current. Check AC Compressor Health.";
pub const ADVICE_HOME_NOMINAL: &str = "Home System Nominal.";

/// Expected voltage at the asset terminals: `V_rated - I_load * Z`.
///
/// # Examples
///
/// ```
/// use grid_twin::twin::expected_voltage;
///
/// assert_eq!(expected_voltage(400.0, 30.0, 1.1), 367.0);
/// ```
pub fn expected_voltage(rated_voltage: f64, load_amps: f64, impedance: f64) -> f64 {
    rated_voltage - load_amps * impedance
}

/// Compares sensor readings against the physics model.
///
/// Thresholds come from configuration; [`TwinModel::default`] uses
/// 10 % / 5 % deviation for grid assets and 255 V / 15 A for homes.
#[derive(Debug, Clone)]
pub struct TwinModel {
    thresholds: ThresholdConfig,
}

impl Default for TwinModel {
    fn default() -> Self {
        Self::new(ThresholdConfig::default())
    }
}

impl TwinModel {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// Classifies a grid asset by its relative deviation from `expected`.
    ///
    /// An expected value of zero cannot be compared and is reported as
    /// critical. Both bounds are strict: a deviation exactly at the
    /// critical limit is still a warning.
    pub fn analyze_health(&self, real: f64, expected: f64) -> HealthStatus {
        if expected == 0.0 {
            return HealthStatus::Critical;
        }
        let deviation_pct = ((real - expected) / expected).abs() * 100.0;
        if deviation_pct > self.thresholds.critical_pct {
            HealthStatus::Critical
        } else if deviation_pct > self.thresholds.warning_pct {
            HealthStatus::Warning
        } else {
            HealthStatus::Normal
        }
    }

    /// Maps a fault signature to engineering advice.
    pub fn recommendation(&self, real: f64, expected: f64, health: HealthStatus) -> &'static str {
        if health == HealthStatus::Normal {
            return ADVICE_OPTIMAL;
        }
        if real < expected {
            ADVICE_OVERLOAD
        } else if real > expected {
            ADVICE_LOAD_REJECTION
        } else {
            ADVICE_ANOMALY
        }
    }

    /// Evaluates smart-home telemetry.
    ///
    /// Surge protection takes precedence over the appliance-wear check.
    pub fn analyze_home(&self, voltage: f64, current: f64) -> (HomeStatus, &'static str) {
        if voltage > self.thresholds.surge_voltage {
            return (HomeStatus::ProtectionActive, ADVICE_SURGE);
        }
        // normal voltage with high current points at motor strain
        if current > self.thresholds.wear_current {
            return (HomeStatus::Warning, ADVICE_HIGH_CURRENT);
        }
        (HomeStatus::Normal, ADVICE_HOME_NOMINAL)
    }
}
