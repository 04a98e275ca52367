//! TOML-based twin configuration and preset definitions.

use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::assets::AssetKind;

/// Top-level twin configuration parsed from TOML.
///
/// Every section has defaults matching the `bulawayo` preset. Load from
/// TOML with [`TwinConfig::from_toml_file`] or use
/// [`TwinConfig::bulawayo`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TwinConfig {
    /// HTTP bind address.
    #[serde(default)]
    pub server: ServerConfig,
    /// Tick rate, noise, and fault limits.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Health classification thresholds.
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    /// Grid assets, numbered from 1 in table order.
    #[serde(default = "default_assets")]
    pub assets: Vec<AssetConfig>,
    /// Smart homes, numbered from 1 in table order.
    #[serde(default = "default_homes")]
    pub homes: Vec<HomeConfig>,
}

/// HTTP bind address.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// Parses `host:port` into a socket address.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `host` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| ConfigError {
            field: "server.host".to_string(),
            message: format!("\"{}\" is not an IP address", self.host),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tick rate, sensor noise, and fault limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Wall-clock interval between engine ticks (ms).
    pub tick_ms: u64,
    /// Master random seed.
    pub seed: u64,
    /// Sensor noise as a fraction of rated voltage (uniform, symmetric).
    pub noise_fraction: f64,
    /// Nominal residential supply voltage (V).
    pub home_rated_voltage: f64,
    /// Service-drop impedance applied to every home (Ω).
    pub home_impedance: f64,
    /// Duration used when a caller does not give one (s).
    pub default_fault_secs: u64,
    /// Longest accepted fault duration (s).
    pub max_fault_secs: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            seed: 42,
            noise_fraction: 0.01,
            home_rated_voltage: 230.0,
            home_impedance: 0.05,
            default_fault_secs: 10,
            max_fault_secs: 3600,
        }
    }
}

/// Health classification thresholds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdConfig {
    /// Deviation above which a grid asset is CRITICAL (%).
    pub critical_pct: f64,
    /// Deviation above which a grid asset is WARNING (%).
    pub warning_pct: f64,
    /// Home supply voltage above which surge protection trips (V).
    pub surge_voltage: f64,
    /// Home current above which appliance wear is flagged (A).
    pub wear_current: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            critical_pct: 10.0,
            warning_pct: 5.0,
            surge_voltage: 255.0,
            wear_current: 15.0,
        }
    }
}

/// One `[[assets]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetConfig {
    pub name: String,
    pub kind: AssetKind,
    pub rated_voltage: f64,
    pub impedance: f64,
}

impl AssetConfig {
    fn new(name: &str, kind: AssetKind, rated_voltage: f64, impedance: f64) -> Self {
        Self {
            name: name.to_string(),
            kind,
            rated_voltage,
            impedance,
        }
    }
}

/// One `[[homes]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HomeConfig {
    pub address: String,
    pub owner: String,
}

fn default_assets() -> Vec<AssetConfig> {
    vec![
        AssetConfig::new("Kariba Hydro Gen", AssetKind::Generation, 11000.0, 5.2),
        AssetConfig::new("Marvel Substation", AssetKind::Transmission, 33000.0, 12.5),
        AssetConfig::new("Bulawayo Industry Feeder", AssetKind::Distribution, 400.0, 1.1),
    ]
}

fn default_homes() -> Vec<HomeConfig> {
    vec![HomeConfig {
        address: "14 Main St, Bulawayo".to_string(),
        owner: "Mr. Dube".to_string(),
    }]
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.tick_ms"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Default for TwinConfig {
    fn default() -> Self {
        Self::bulawayo()
    }
}

impl TwinConfig {
    /// Returns the baseline grid: Kariba, Marvel, the Bulawayo feeder, and one home.
    pub fn bulawayo() -> Self {
        Self {
            server: ServerConfig::default(),
            simulation: SimulationConfig::default(),
            thresholds: ThresholdConfig::default(),
            assets: default_assets(),
            homes: default_homes(),
        }
    }

    /// Returns the stress preset: a second feeder, noisier sensors, and a
    /// tighter warning band.
    pub fn stress() -> Self {
        let mut assets = default_assets();
        assets.push(AssetConfig::new(
            "Hwange Township Feeder",
            AssetKind::Distribution,
            400.0,
            1.4,
        ));
        Self {
            simulation: SimulationConfig {
                noise_fraction: 0.03,
                ..SimulationConfig::default()
            },
            thresholds: ThresholdConfig {
                warning_pct: 2.5,
                critical_pct: 6.0,
                ..ThresholdConfig::default()
            },
            assets,
            homes: vec![
                HomeConfig {
                    address: "14 Main St, Bulawayo".to_string(),
                    owner: "Mr. Dube".to_string(),
                },
                HomeConfig {
                    address: "7 Lobengula St, Bulawayo".to_string(),
                    owner: "Ms. Ncube".to_string(),
                },
            ],
            ..Self::bulawayo()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["bulawayo", "stress"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "bulawayo" => Ok(Self::bulawayo()),
            "stress" => Ok(Self::stress()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.socket_addr().is_err() {
            errors.push(ConfigError::new("server.host", "must be an IP address"));
        }

        let s = &self.simulation;
        if s.tick_ms == 0 {
            errors.push(ConfigError::new("simulation.tick_ms", "must be > 0"));
        }
        if !(0.0..1.0).contains(&s.noise_fraction) {
            errors.push(ConfigError::new(
                "simulation.noise_fraction",
                "must be in [0.0, 1.0)",
            ));
        }
        if !s.home_rated_voltage.is_finite() || s.home_rated_voltage <= 0.0 {
            errors.push(ConfigError::new("simulation.home_rated_voltage", "must be > 0"));
        }
        if !s.home_impedance.is_finite() || s.home_impedance < 0.0 {
            errors.push(ConfigError::new("simulation.home_impedance", "must be >= 0"));
        }
        if s.max_fault_secs == 0 {
            errors.push(ConfigError::new("simulation.max_fault_secs", "must be > 0"));
        }
        if s.default_fault_secs == 0 || s.default_fault_secs > s.max_fault_secs {
            errors.push(ConfigError::new(
                "simulation.default_fault_secs",
                "must be in [1, simulation.max_fault_secs]",
            ));
        }

        let t = &self.thresholds;
        if t.warning_pct.is_nan() || t.warning_pct < 0.0 {
            errors.push(ConfigError::new("thresholds.warning_pct", "must be >= 0"));
        }
        if !t.critical_pct.is_finite() || t.warning_pct >= t.critical_pct {
            errors.push(ConfigError::new(
                "thresholds.warning_pct",
                "must be < thresholds.critical_pct",
            ));
        }
        if !t.surge_voltage.is_finite() || t.surge_voltage <= s.home_rated_voltage {
            errors.push(ConfigError::new(
                "thresholds.surge_voltage",
                "must be > simulation.home_rated_voltage",
            ));
        }
        if !t.wear_current.is_finite() || t.wear_current <= 0.0 {
            errors.push(ConfigError::new("thresholds.wear_current", "must be > 0"));
        }

        for (i, a) in self.assets.iter().enumerate() {
            if a.name.trim().is_empty() {
                errors.push(ConfigError::new(format!("assets[{i}].name"), "must not be empty"));
            }
            if a.kind == AssetKind::SmartHome {
                errors.push(ConfigError::new(
                    format!("assets[{i}].kind"),
                    "smart homes belong in [[homes]]",
                ));
            }
            if !a.rated_voltage.is_finite() || a.rated_voltage <= 0.0 {
                errors.push(ConfigError::new(
                    format!("assets[{i}].rated_voltage"),
                    "must be > 0",
                ));
            }
            if !a.impedance.is_finite() || a.impedance < 0.0 {
                errors.push(ConfigError::new(format!("assets[{i}].impedance"), "must be >= 0"));
            }
        }

        for (i, h) in self.homes.iter().enumerate() {
            if h.address.trim().is_empty() {
                errors.push(ConfigError::new(
                    format!("homes[{i}].address"),
                    "must not be empty",
                ));
            }
        }

        if self.assets.is_empty() && self.homes.is_empty() {
            errors.push(ConfigError::new("assets", "at least one asset or home is required"));
        }

        errors
    }
}
