//! Post-hoc health summary computed from offline run records.

use std::fmt;

use serde::Serialize;

use super::types::TickRecord;
use crate::assets::SensorKey;
use crate::twin::HealthStatus;

/// Per-asset aggregates over a complete run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSummary {
    pub id: SensorKey,
    pub name: String,
    /// Ticks observed.
    pub ticks: usize,
    pub normal_ticks: usize,
    pub warning_ticks: usize,
    pub critical_ticks: usize,
    /// Ticks with an injected fault active.
    pub faulted_ticks: usize,
    /// Lowest measured voltage (V).
    pub min_voltage: f64,
    /// Highest measured voltage (V).
    pub max_voltage: f64,
}

/// Health summary derived from `Vec<TickRecord>`.
///
/// Computed post-hoc so the report always matches the exported records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HealthReport {
    /// One entry per asset, in first-seen order.
    pub assets: Vec<AssetSummary>,
}

impl HealthReport {
    /// Aggregates `records` by sensor key.
    pub fn from_records(records: &[TickRecord]) -> Self {
        let mut assets: Vec<AssetSummary> = Vec::new();

        for r in records {
            let s = &r.status;
            let idx = match assets.iter().position(|a| a.id == s.id) {
                Some(idx) => idx,
                None => {
                    assets.push(AssetSummary {
                        id: s.id,
                        name: s.name.clone(),
                        ticks: 0,
                        normal_ticks: 0,
                        warning_ticks: 0,
                        critical_ticks: 0,
                        faulted_ticks: 0,
                        min_voltage: f64::INFINITY,
                        max_voltage: f64::NEG_INFINITY,
                    });
                    assets.len() - 1
                }
            };
            let a = &mut assets[idx];
            a.ticks += 1;
            match s.health_status {
                HealthStatus::Normal => a.normal_ticks += 1,
                HealthStatus::Warning => a.warning_ticks += 1,
                HealthStatus::Critical => a.critical_ticks += 1,
            }
            if s.fault.is_some() {
                a.faulted_ticks += 1;
            }
            a.min_voltage = a.min_voltage.min(s.real_value);
            a.max_voltage = a.max_voltage.max(s.real_value);
        }

        Self { assets }
    }

    /// Total ticks spent in a non-normal state across all assets.
    pub fn abnormal_ticks(&self) -> usize {
        self.assets
            .iter()
            .map(|a| a.warning_ticks + a.critical_ticks)
            .sum()
    }

    pub fn get(&self, id: SensorKey) -> Option<&AssetSummary> {
        self.assets.iter().find(|a| a.id == id)
    }
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Health Report ---")?;
        for a in &self.assets {
            writeln!(
                f,
                "{:<7} {:<26} ok={:>4} warn={:>4} crit={:>4} faulted={:>4} | V[min={:.2}, max={:.2}]",
                a.id.to_string(),
                a.name,
                a.normal_ticks,
                a.warning_ticks,
                a.critical_ticks,
                a.faulted_ticks,
                a.min_voltage,
                a.max_voltage,
            )?;
        }
        write!(f, "Abnormal asset-ticks:  {}", self.abnormal_ticks())
    }
}
