//! Simulation engine that ticks every sensor and evaluates it against the twin.

use std::collections::HashMap;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use super::clock::Clock;
use super::fault::{FaultKind, FaultSnapshot, FaultTable};
use super::schedule::FaultSchedule;
use super::types::{AssetStatus, SensorReading, TickRecord, round2};
use crate::assets::{AssetRef, LoadProfile, Registry, SensorKey};
use crate::config::{SimulationConfig, TwinConfig};
use crate::error::{Result, TwinError};
use crate::twin::{HealthStatus, TwinModel, expected_voltage};

/// Upper bound on records reserved up front by [`Engine::run`].
const MAX_PREALLOC_RECORDS: usize = 1 << 16;

fn record_capacity(ticks: usize, assets: usize) -> usize {
    ticks.saturating_mul(assets).min(MAX_PREALLOC_RECORDS)
}

/// Simulation engine owning the registry, sensor state, and fault table.
///
/// Time is passed in explicitly as seconds, so the same engine serves the
/// live server (wall clock) and offline runs (fixed tick spacing).
pub struct Engine {
    registry: Registry,
    model: TwinModel,
    sim: SimulationConfig,
    faults: FaultTable,
    readings: HashMap<SensorKey, SensorReading>,
    rng: StdRng,
    ticks: usize,
    last_tick_s: Option<f64>,
}

impl Engine {
    /// Builds an engine from a validated configuration.
    pub fn from_config(cfg: &TwinConfig) -> Self {
        Self::new(
            Registry::from_config(cfg),
            TwinModel::new(cfg.thresholds.clone()),
            cfg.simulation.clone(),
        )
    }

    /// Creates a new engine.
    ///
    /// # Arguments
    ///
    /// * `registry` - Assets to monitor
    /// * `model` - Twin model with health thresholds
    /// * `sim` - Noise, home supply, and fault-duration settings
    pub fn new(registry: Registry, model: TwinModel, sim: SimulationConfig) -> Self {
        let rng = StdRng::seed_from_u64(sim.seed);
        Self {
            registry,
            model,
            sim,
            faults: FaultTable::new(),
            readings: HashMap::new(),
            rng,
            ticks: 0,
            last_tick_s: None,
        }
    }

    /// Rated voltage and impedance for one asset.
    fn electrical(&self, asset: &AssetRef<'_>) -> (f64, f64) {
        electrical(&self.sim, asset)
    }

    /// Samples one fresh reading for every asset at time `now` (s).
    ///
    /// Faults whose window closed before `now` are removed first; the
    /// remaining ones distort the healthy reading.
    pub fn step(&mut self, now: f64) {
        for (key, fault) in self.faults.expire(now) {
            info!(target_key = %key, fault = %fault.kind, "fault expired");
        }

        let noise_fraction = self.sim.noise_fraction;
        for asset in self.registry.iter() {
            let key = asset.key();
            let (rated, impedance) = electrical(&self.sim, &asset);

            let noise = if noise_fraction > 0.0 {
                self.rng.random_range(-noise_fraction..=noise_fraction) * rated
            } else {
                0.0
            };
            let mut load = LoadProfile::for_kind(asset.kind()).sample(&mut self.rng);
            let mut voltage = rated + noise - load * impedance;

            if let Some(kind) = self.faults.active_kind(key, now) {
                voltage = kind.apply_voltage(voltage);
                if let Some(amps) = kind.forced_current() {
                    load = amps;
                }
            }

            self.readings.insert(
                key,
                SensorReading {
                    voltage: round2(voltage),
                    load_amps: load,
                },
            );
        }

        self.ticks += 1;
        self.last_tick_s = Some(now);
        debug!(tick = self.ticks, now, "engine tick");
    }

    /// Returns the latest reading for `key`.
    ///
    /// Assets that have not been ticked yet read as healthy: mean load and
    /// the matching expected voltage.
    pub fn reading(&self, key: SensorKey) -> Option<SensorReading> {
        if let Some(r) = self.readings.get(&key) {
            return Some(*r);
        }
        let asset = self.registry.get(key)?;
        let (rated, impedance) = self.electrical(&asset);
        let load = LoadProfile::for_kind(asset.kind()).base_amps;
        Some(SensorReading {
            voltage: round2(expected_voltage(rated, load, impedance)),
            load_amps: load,
        })
    }

    /// Builds one dashboard row per asset, grid assets first.
    ///
    /// `now` only decides which faults are reported as active; readings
    /// come from the last tick.
    pub fn status(&self, now: f64) -> Vec<AssetStatus> {
        self.registry
            .iter()
            .filter_map(|asset| self.asset_status(&asset, now))
            .collect()
    }

    fn asset_status(&self, asset: &AssetRef<'_>, now: f64) -> Option<AssetStatus> {
        let key = asset.key();
        let reading = self.reading(key)?;
        let (rated, impedance) = self.electrical(asset);
        let fault = self.faults.active_kind(key, now);

        let (owner, expected, health, recommendation) = match asset {
            AssetRef::Grid(_) => {
                let expected = expected_voltage(rated, reading.load_amps, impedance);
                let health = self.model.analyze_health(reading.voltage, expected);
                let rec = self.model.recommendation(reading.voltage, expected, health);
                (None, expected, health, rec)
            }
            AssetRef::Home(home) => {
                let (home_status, advisory) =
                    self.model.analyze_home(reading.voltage, reading.load_amps);
                (
                    Some(home.owner.clone()),
                    rated,
                    HealthStatus::from(home_status),
                    advisory,
                )
            }
        };

        Some(AssetStatus {
            id: key,
            name: asset.name().to_string(),
            owner,
            kind: asset.kind(),
            real_value: reading.voltage,
            expected_value: round2(expected),
            health_status: health,
            load_amps: round2(reading.load_amps),
            recommendation: recommendation.to_string(),
            fault,
        })
    }

    /// Starts a fault on `key` at time `now` (s).
    ///
    /// # Errors
    ///
    /// * `UnknownTarget` if `key` is not registered
    /// * `FaultNotApplicable` if a home-only fault targets a grid asset
    /// * `InvalidDuration` if `duration_secs` is 0 or above the configured maximum
    pub fn inject_fault(
        &mut self,
        key: SensorKey,
        kind: FaultKind,
        duration_secs: u64,
        now: f64,
    ) -> Result<()> {
        if !self.registry.contains(key) {
            return Err(TwinError::UnknownTarget(key));
        }
        if kind.is_home_only() && !key.is_home() {
            return Err(TwinError::FaultNotApplicable { kind, target: key });
        }
        let max = self.sim.max_fault_secs;
        if duration_secs == 0 || duration_secs > max {
            return Err(TwinError::InvalidDuration {
                got: duration_secs,
                max,
            });
        }

        let replaced = self.faults.inject(key, kind, duration_secs, now);
        info!(
            target_key = %key,
            fault = %kind,
            duration_secs,
            replaced = ?replaced.map(|f| f.kind),
            "fault injected"
        );
        Ok(())
    }

    /// Ends the fault on `key` early. Returns `true` if one was active.
    pub fn clear_fault(&mut self, key: SensorKey) -> bool {
        let cleared = self.faults.clear(key);
        if let Some(f) = cleared {
            info!(target_key = %key, fault = %f.kind, "fault cleared");
        }
        cleared.is_some()
    }

    /// Live faults with their remaining time at `now`.
    pub fn active_faults(&self, now: f64) -> Vec<FaultSnapshot> {
        self.faults.snapshot(now)
    }

    /// Runs `ticks` steps spaced `dt_secs` apart, applying `schedule`
    /// before each step, and records every asset's status.
    ///
    /// # Errors
    ///
    /// Returns [`TwinError::InvalidScript`] for an entry scheduled at or past
    /// `ticks`, before anything runs, or the first fault injection the engine
    /// rejects.
    pub fn run(
        &mut self,
        ticks: usize,
        dt_secs: f64,
        schedule: &FaultSchedule,
    ) -> Result<Vec<TickRecord>> {
        if let Some(late) = schedule.entries().iter().find(|e| e.at_tick >= ticks) {
            return Err(TwinError::InvalidScript {
                script: late.to_string(),
                message: format!("tick {} is outside the run (0..{ticks})", late.at_tick),
            });
        }
        let mut records = Vec::with_capacity(record_capacity(ticks, self.registry.len()));
        let mut clock = Clock::new(ticks, dt_secs);
        while let Some(tick) = clock.tick() {
            let now = tick.time_s;
            for entry in schedule.due_at(tick.index) {
                self.inject_fault(entry.target, entry.kind, entry.duration_secs, now)?;
            }
            self.step(now);
            records.extend(self.status(now).into_iter().map(|status| TickRecord {
                tick: tick.index,
                time_s: now,
                status,
            }));
        }
        Ok(records)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn model(&self) -> &TwinModel {
        &self.model
    }

    pub fn sim_config(&self) -> &SimulationConfig {
        &self.sim
    }

    /// Number of ticks executed so far.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Time of the most recent tick (s).
    pub fn last_tick_s(&self) -> Option<f64> {
        self.last_tick_s
    }
}

fn electrical(sim: &SimulationConfig, asset: &AssetRef<'_>) -> (f64, f64) {
    match asset {
        AssetRef::Grid(a) => (a.rated_voltage, a.impedance),
        AssetRef::Home(_) => (sim.home_rated_voltage, sim.home_impedance),
    }
}
