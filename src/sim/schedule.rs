use std::fmt;
use std::str::FromStr;

use super::fault::FaultKind;
use crate::assets::SensorKey;
use crate::error::TwinError;

/// Duration used by scripted faults that omit `+<secs>`.
pub const DEFAULT_SCRIPT_SECS: u64 = 10;

/// One fault to inject at a given tick of an offline run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledFault {
    pub at_tick: usize,
    pub target: SensorKey,
    pub kind: FaultKind,
    pub duration_secs: u64,
}

impl FromStr for ScheduledFault {
    type Err = TwinError;

    /// Parses `<key>:<fault>@<tick>[+<secs>]`, e.g. `grid_2:zero@5+30`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: String| TwinError::InvalidScript {
            script: s.to_string(),
            message,
        };

        let (target, rest) = s
            .split_once(':')
            .ok_or_else(|| invalid("expected <key>:<fault>@<tick>[+<secs>]".to_string()))?;
        let target: SensorKey = target.trim().parse().map_err(invalid)?;

        let (kind, timing) = rest
            .split_once('@')
            .ok_or_else(|| invalid("missing @<tick>".to_string()))?;
        let kind: FaultKind = kind.parse().map_err(invalid)?;

        let (tick, secs) = match timing.split_once('+') {
            Some((tick, secs)) => (tick, Some(secs)),
            None => (timing, None),
        };
        let at_tick = tick
            .trim()
            .parse::<usize>()
            .map_err(|_| invalid(format!("tick \"{tick}\" is not a non-negative integer")))?;
        let duration_secs = match secs {
            Some(secs) => secs
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid(format!("duration \"{secs}\" is not a whole number of seconds")))?,
            None => DEFAULT_SCRIPT_SECS,
        };

        Ok(Self {
            at_tick,
            target,
            kind,
            duration_secs,
        })
    }
}

impl fmt::Display for ScheduledFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}+{}", self.target, self.kind, self.at_tick, self.duration_secs)
    }
}

/// Scripted faults for an offline run, kept in tick order.
#[derive(Debug, Clone, Default)]
pub struct FaultSchedule {
    entries: Vec<ScheduledFault>,
}

impl FaultSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, keeping entries with equal ticks in insertion order.
    pub fn push(&mut self, entry: ScheduledFault) {
        let pos = self.entries.partition_point(|e| e.at_tick <= entry.at_tick);
        self.entries.insert(pos, entry);
    }

    /// Entries to apply immediately before tick `tick`.
    pub fn due_at(&self, tick: usize) -> impl Iterator<Item = &ScheduledFault> {
        self.entries.iter().filter(move |e| e.at_tick == tick)
    }

    pub fn entries(&self) -> &[ScheduledFault] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ScheduledFault> for FaultSchedule {
    fn from_iter<I: IntoIterator<Item = ScheduledFault>>(iter: I) -> Self {
        let mut schedule = Self::new();
        for entry in iter {
            schedule.push(entry);
        }
        schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_script() {
        let f: ScheduledFault = "grid_2:zero@5+30".parse().unwrap();
        assert_eq!(f.target, SensorKey::Grid(2));
        assert_eq!(f.kind, FaultKind::ZeroVoltage);
        assert_eq!(f.at_tick, 5);
        assert_eq!(f.duration_secs, 30);
    }

    #[test]
    fn parses_wire_label_and_default_duration() {
        let f: ScheduledFault = "home_1:Grid Surge@0".parse().unwrap();
        assert_eq!(f.kind, FaultKind::GridSurge);
        assert_eq!(f.duration_secs, DEFAULT_SCRIPT_SECS);
    }

    #[test]
    fn rejects_malformed_scripts() {
        for bad in ["grid_2", "grid_2:zero", "pump_1:zero@1", "grid_1:melt@1", "grid_1:dip@x", "grid_1:dip@1+y"] {
            assert!(
                bad.parse::<ScheduledFault>().is_err(),
                "\"{bad}\" should not parse"
            );
        }
    }

    #[test]
    fn schedule_stays_sorted() {
        let schedule: FaultSchedule = ["grid_1:dip@9", "grid_2:spike@2", "grid_3:zero@2"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let ticks: Vec<usize> = schedule.entries().iter().map(|e| e.at_tick).collect();
        assert_eq!(ticks, vec![2, 2, 9]);
        assert_eq!(schedule.due_at(2).count(), 2);
        assert_eq!(schedule.due_at(3).count(), 0);
        // equal ticks keep insertion order
        assert_eq!(schedule.entries()[0].target, SensorKey::Grid(2));
    }
}
