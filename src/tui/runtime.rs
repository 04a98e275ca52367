//! In-process engine and TUI application state.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use crate::assets::SensorKey;
use crate::config::TwinConfig;
use crate::sim::engine::Engine;
use crate::sim::fault::FaultKind;
use crate::sim::types::AssetStatus;

/// Maximum number of history entries kept per asset for the chart.
const MAX_HISTORY: usize = 120;

/// Tick interval options in milliseconds (slowest → fastest).
const SPEED_LEVELS_MS: [u64; 5] = [2000, 1000, 500, 250, 100];

/// Default speed index (1 s, the live server's rate).
const DEFAULT_SPEED_IDX: usize = 1;

/// TUI application state.
///
/// Simulation time advances by the configured tick length on every tick,
/// whatever the display speed, so fault durations are in simulated seconds.
pub struct App {
    engine: Engine,
    keys: Vec<SensorKey>,
    dt_secs: f64,
    default_fault_secs: u64,
    /// Latest status rows, registry order.
    pub rows: Vec<AssetStatus>,
    /// Rolling `(time_s, voltage)` samples per asset.
    pub history: HashMap<SensorKey, VecDeque<(f64, f64)>>,
    /// Index of the selected row.
    pub selected: usize,
    /// Simulated seconds elapsed.
    pub sim_time_s: f64,
    /// Whether the simulation is paused.
    pub paused: bool,
    /// Current index into `SPEED_LEVELS_MS`.
    pub speed_idx: usize,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// When the last simulation tick was executed.
    pub last_tick: Instant,
    /// Outcome of the last operator action.
    pub message: Option<String>,
}

impl App {
    pub fn new(cfg: &TwinConfig) -> Self {
        let engine = Engine::from_config(cfg);
        let keys: Vec<SensorKey> = engine.registry().iter().map(|a| a.key()).collect();
        let rows = engine.status(0.0);
        Self {
            engine,
            keys,
            dt_secs: cfg.simulation.tick_ms as f64 / 1000.0,
            default_fault_secs: cfg.simulation.default_fault_secs,
            rows,
            history: HashMap::new(),
            selected: 0,
            sim_time_s: 0.0,
            paused: false,
            speed_idx: DEFAULT_SPEED_IDX,
            quit: false,
            last_tick: Instant::now(),
            message: None,
        }
    }

    /// Advances the engine by one tick and records every asset's voltage.
    pub fn tick(&mut self) {
        self.sim_time_s += self.dt_secs;
        let now = self.sim_time_s;
        self.engine.step(now);
        self.rows = self.engine.status(now);
        for row in &self.rows {
            let h = self.history.entry(row.id).or_default();
            if h.len() >= MAX_HISTORY {
                h.pop_front();
            }
            h.push_back((now, row.real_value));
        }
    }

    /// Toggles pause/resume.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Increases simulation speed (shorter tick interval).
    pub fn speed_up(&mut self) {
        if self.speed_idx + 1 < SPEED_LEVELS_MS.len() {
            self.speed_idx += 1;
        }
    }

    /// Decreases simulation speed (longer tick interval).
    pub fn speed_down(&mut self) {
        self.speed_idx = self.speed_idx.saturating_sub(1);
    }

    /// Returns the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        SPEED_LEVELS_MS[self.speed_idx]
    }

    pub fn select_next(&mut self) {
        if !self.keys.is_empty() {
            self.selected = (self.selected + 1) % self.keys.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.keys.is_empty() {
            self.selected = (self.selected + self.keys.len() - 1) % self.keys.len();
        }
    }

    pub fn selected_key(&self) -> Option<SensorKey> {
        self.keys.get(self.selected).copied()
    }

    pub fn selected_row(&self) -> Option<&AssetStatus> {
        self.rows.get(self.selected)
    }

    /// Voltage history of the selected asset.
    pub fn selected_history(&self) -> Vec<(f64, f64)> {
        self.selected_key()
            .and_then(|k| self.history.get(&k))
            .map(|h| h.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Injects `kind` on the selected asset for the default duration.
    pub fn inject(&mut self, kind: FaultKind) {
        let Some(key) = self.selected_key() else {
            return;
        };
        let now = self.sim_time_s;
        self.message = Some(
            match self
                .engine
                .inject_fault(key, kind, self.default_fault_secs, now)
            {
                Ok(()) => format!("{kind} -> {key} ({}s)", self.default_fault_secs),
                Err(e) => format!("rejected: {e}"),
            },
        );
        self.rows = self.engine.status(now);
    }

    /// Clears the selected asset's fault, if any.
    pub fn clear_selected(&mut self) {
        let Some(key) = self.selected_key() else {
            return;
        };
        self.message = Some(if self.engine.clear_fault(key) {
            format!("cleared fault on {key}")
        } else {
            format!("no active fault on {key}")
        });
        self.rows = self.engine.status(self.sim_time_s);
    }

    /// Number of live faults.
    pub fn active_fault_count(&self) -> usize {
        self.engine.active_faults(self.sim_time_s).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twin::HealthStatus;

    fn app() -> App {
        App::new(&TwinConfig::bulawayo())
    }

    #[test]
    fn app_creates_and_ticks() {
        let mut app = app();
        assert_eq!(app.rows.len(), 4);
        app.tick();
        assert_eq!(app.sim_time_s, 1.0);
        assert_eq!(app.selected_history().len(), 1);
    }

    #[test]
    fn history_caps_at_max() {
        let mut app = app();
        for _ in 0..MAX_HISTORY + 10 {
            app.tick();
        }
        assert_eq!(app.selected_history().len(), MAX_HISTORY);
    }

    #[test]
    fn selection_wraps() {
        let mut app = app();
        app.select_prev();
        assert_eq!(app.selected_key(), Some(SensorKey::Home(1)));
        app.select_next();
        assert_eq!(app.selected_key(), Some(SensorKey::Grid(1)));
    }

    #[test]
    fn speed_controls_stay_in_bounds() {
        let mut app = app();
        for _ in 0..10 {
            app.speed_down();
        }
        assert_eq!(app.speed_idx, 0);
        for _ in 0..10 {
            app.speed_up();
        }
        assert_eq!(app.speed_idx, SPEED_LEVELS_MS.len() - 1);
    }

    #[test]
    fn inject_and_clear_selected() {
        let mut app = app();
        app.inject(FaultKind::ZeroVoltage);
        assert_eq!(app.active_fault_count(), 1);
        app.tick();
        let row = app.selected_row().unwrap();
        assert_eq!(row.real_value, 0.0);
        assert_eq!(row.health_status, HealthStatus::Critical);

        app.clear_selected();
        assert_eq!(app.active_fault_count(), 0);
        assert_eq!(app.message.as_deref(), Some("cleared fault on grid_1"));
    }

    #[test]
    fn home_fault_on_grid_is_reported() {
        let mut app = app();
        app.inject(FaultKind::GridSurge);
        assert_eq!(app.active_fault_count(), 0);
        assert!(app.message.as_deref().unwrap().starts_with("rejected:"));
    }

    #[test]
    fn toggle_pause() {
        let mut app = app();
        assert!(!app.paused);
        app.toggle_pause();
        assert!(app.paused);
        app.toggle_pause();
        assert!(!app.paused);
    }
}
