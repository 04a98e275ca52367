use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assets::SensorKey;

/// Voltage multiplier for a sag.
pub const DIP_FACTOR: f64 = 0.65;
/// Voltage multiplier for a swell.
pub const SPIKE_FACTOR: f64 = 1.40;
/// Supply voltage forced by a grid surge on a home (V).
pub const SURGE_VOLTAGE: f64 = 265.0;
/// Current forced by appliance wear on a home (A).
pub const WEAR_CURRENT: f64 = 18.5;

/// Abnormal condition an operator can inject into one sensor stream.
///
/// Serialized with the labels the admin console sends on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultKind {
    #[serde(rename = "Voltage Dip")]
    VoltageDip,
    #[serde(rename = "Voltage Spike")]
    VoltageSpike,
    #[serde(rename = "Zero Voltage")]
    ZeroVoltage,
    #[serde(rename = "Grid Surge")]
    GridSurge,
    #[serde(rename = "Home Wear")]
    HomeWear,
}

impl FaultKind {
    pub const ALL: [FaultKind; 5] = [
        Self::VoltageDip,
        Self::VoltageSpike,
        Self::ZeroVoltage,
        Self::GridSurge,
        Self::HomeWear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::VoltageDip => "Voltage Dip",
            Self::VoltageSpike => "Voltage Spike",
            Self::ZeroVoltage => "Zero Voltage",
            Self::GridSurge => "Grid Surge",
            Self::HomeWear => "Home Wear",
        }
    }

    /// Surge and wear model residential conditions and only make sense on homes.
    pub fn is_home_only(self) -> bool {
        matches!(self, Self::GridSurge | Self::HomeWear)
    }

    /// Returns the faulted voltage for a healthy reading of `voltage`.
    pub fn apply_voltage(self, voltage: f64) -> f64 {
        match self {
            Self::VoltageDip => voltage * DIP_FACTOR,
            Self::VoltageSpike => voltage * SPIKE_FACTOR,
            Self::ZeroVoltage => 0.0,
            Self::GridSurge => SURGE_VOLTAGE,
            Self::HomeWear => voltage,
        }
    }

    /// Current override, if this fault pins the load.
    pub fn forced_current(self) -> Option<f64> {
        match self {
            Self::HomeWear => Some(WEAR_CURRENT),
            _ => None,
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for FaultKind {
    type Err = String;

    /// Accepts the wire label or a short alias (`dip`, `spike`, `zero`, `surge`, `wear`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let kind = match normalized.as_str() {
            "voltage dip" | "dip" | "sag" => Self::VoltageDip,
            "voltage spike" | "spike" | "swell" => Self::VoltageSpike,
            "zero voltage" | "zero" | "trip" => Self::ZeroVoltage,
            "grid surge" | "surge" => Self::GridSurge,
            "home wear" | "wear" => Self::HomeWear,
            _ => {
                let names: Vec<&str> = Self::ALL.iter().map(|k| k.label()).collect();
                return Err(format!(
                    "unknown fault type \"{s}\", expected one of: {}",
                    names.join(", ")
                ));
            }
        };
        Ok(kind)
    }
}

/// A fault window on one sensor, in simulation seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveFault {
    pub kind: FaultKind,
    pub started_at: f64,
    pub end_at: f64,
}

impl ActiveFault {
    /// The window is closed at both ends: still active when `now == end_at`.
    pub fn is_active(&self, now: f64) -> bool {
        now <= self.end_at
    }

    pub fn remaining_secs(&self, now: f64) -> f64 {
        (self.end_at - now).max(0.0)
    }
}

/// Public view of one live fault.
#[derive(Debug, Clone, Serialize)]
pub struct FaultSnapshot {
    pub target: SensorKey,
    pub fault_type: FaultKind,
    pub remaining_secs: f64,
}

/// Injected faults keyed by sensor, at most one per sensor.
#[derive(Debug, Clone, Default)]
pub struct FaultTable {
    faults: BTreeMap<SensorKey, ActiveFault>,
}

impl FaultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `kind` on `key` for `duration_secs`, replacing any fault
    /// already there. Returns the replaced fault.
    pub fn inject(
        &mut self,
        key: SensorKey,
        kind: FaultKind,
        duration_secs: u64,
        now: f64,
    ) -> Option<ActiveFault> {
        self.faults.insert(
            key,
            ActiveFault {
                kind,
                started_at: now,
                end_at: now + duration_secs as f64,
            },
        )
    }

    pub fn clear(&mut self, key: SensorKey) -> Option<ActiveFault> {
        self.faults.remove(&key)
    }

    /// Removes and returns every fault whose window closed before `now`.
    pub fn expire(&mut self, now: f64) -> Vec<(SensorKey, ActiveFault)> {
        let expired: Vec<SensorKey> = self
            .faults
            .iter()
            .filter(|(_, f)| !f.is_active(now))
            .map(|(k, _)| *k)
            .collect();
        expired
            .into_iter()
            .filter_map(|k| self.faults.remove(&k).map(|f| (k, f)))
            .collect()
    }

    /// Returns the fault kind active on `key` at `now`, if any.
    pub fn active_kind(&self, key: SensorKey, now: f64) -> Option<FaultKind> {
        self.faults
            .get(&key)
            .filter(|f| f.is_active(now))
            .map(|f| f.kind)
    }

    pub fn get(&self, key: SensorKey) -> Option<&ActiveFault> {
        self.faults.get(&key)
    }

    /// Lists live faults ordered by sensor key.
    pub fn snapshot(&self, now: f64) -> Vec<FaultSnapshot> {
        self.faults
            .iter()
            .filter(|(_, f)| f.is_active(now))
            .map(|(k, f)| FaultSnapshot {
                target: *k,
                fault_type: f.kind,
                remaining_secs: f.remaining_secs(now),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.faults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voltage_effects() {
        assert!((FaultKind::VoltageDip.apply_voltage(100.0) - 65.0).abs() < 1e-9);
        assert!((FaultKind::VoltageSpike.apply_voltage(100.0) - 140.0).abs() < 1e-9);
        assert_eq!(FaultKind::ZeroVoltage.apply_voltage(11000.0), 0.0);
        assert_eq!(FaultKind::GridSurge.apply_voltage(230.0), 265.0);
        assert_eq!(FaultKind::HomeWear.apply_voltage(229.5), 229.5);
        assert_eq!(FaultKind::HomeWear.forced_current(), Some(18.5));
        assert_eq!(FaultKind::VoltageDip.forced_current(), None);
    }

    #[test]
    fn parses_wire_labels_and_aliases() {
        for kind in FaultKind::ALL {
            assert_eq!(kind.label().parse::<FaultKind>(), Ok(kind));
        }
        assert_eq!("surge".parse::<FaultKind>(), Ok(FaultKind::GridSurge));
        assert_eq!(" ZERO ".parse::<FaultKind>(), Ok(FaultKind::ZeroVoltage));
        assert!("Meltdown".parse::<FaultKind>().is_err());
    }

    #[test]
    fn serde_uses_wire_labels() {
        let kind: FaultKind = serde_json::from_str("\"Home Wear\"").unwrap();
        assert_eq!(kind, FaultKind::HomeWear);
        assert!(serde_json::from_str::<FaultKind>("\"home wear\"").is_err());
    }

    #[test]
    fn window_is_inclusive_of_end() {
        let mut table = FaultTable::new();
        table.inject(SensorKey::Grid(1), FaultKind::VoltageDip, 10, 5.0);
        assert_eq!(table.active_kind(SensorKey::Grid(1), 15.0), Some(FaultKind::VoltageDip));
        assert!(table.expire(15.0).is_empty());
        assert_eq!(table.active_kind(SensorKey::Grid(1), 15.5), None);
        let expired = table.expire(15.5);
        assert_eq!(expired.len(), 1);
        assert!(table.is_empty());
    }

    #[test]
    fn last_injection_wins() {
        let mut table = FaultTable::new();
        let key = SensorKey::Home(1);
        assert!(table.inject(key, FaultKind::HomeWear, 60, 0.0).is_none());
        let prev = table.inject(key, FaultKind::GridSurge, 10, 1.0);
        assert_eq!(prev.map(|f| f.kind), Some(FaultKind::HomeWear));
        assert_eq!(table.len(), 1);
        assert_eq!(table.active_kind(key, 11.0), Some(FaultKind::GridSurge));
        assert_eq!(table.active_kind(key, 12.0), None);
    }

    #[test]
    fn snapshot_reports_remaining_time() {
        let mut table = FaultTable::new();
        table.inject(SensorKey::Grid(2), FaultKind::ZeroVoltage, 30, 0.0);
        table.inject(SensorKey::Grid(1), FaultKind::VoltageSpike, 5, 0.0);
        let snap = table.snapshot(10.0);
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].target, SensorKey::Grid(2));
        assert_eq!(snap[0].remaining_secs, 20.0);
    }

    #[test]
    fn home_only_kinds() {
        assert!(FaultKind::GridSurge.is_home_only());
        assert!(FaultKind::HomeWear.is_home_only());
        assert!(!FaultKind::ZeroVoltage.is_home_only());
    }
}
