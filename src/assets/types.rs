//! Asset kinds and sensor keys shared across the twin.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Category of a monitored asset.
///
/// The serialized names are the labels shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Generation,
    Transmission,
    Distribution,
    #[serde(rename = "Smart Home")]
    SmartHome,
}

impl AssetKind {
    /// Dashboard label for this kind.
    pub fn label(self) -> &'static str {
        match self {
            Self::Generation => "Generation",
            Self::Transmission => "Transmission",
            Self::Distribution => "Distribution",
            Self::SmartHome => "Smart Home",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Identifier of one sensor stream.
///
/// Grid assets and smart homes are numbered independently, so the key
/// carries the namespace: `grid_1` and `home_1` are different sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorKey {
    Grid(u32),
    Home(u32),
}

impl SensorKey {
    /// Builds a key from the admin wire format (`asset_id` + `is_home`).
    pub fn new(id: u32, is_home: bool) -> Self {
        if is_home { Self::Home(id) } else { Self::Grid(id) }
    }

    pub fn is_home(self) -> bool {
        matches!(self, Self::Home(_))
    }

    pub fn id(self) -> u32 {
        match self {
            Self::Grid(id) | Self::Home(id) => id,
        }
    }
}

impl fmt::Display for SensorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(id) => write!(f, "grid_{id}"),
            Self::Home(id) => write!(f, "home_{id}"),
        }
    }
}

impl FromStr for SensorKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ctor, rest): (fn(u32) -> Self, &str) = if let Some(rest) = s.strip_prefix("grid_") {
            (Self::Grid, rest)
        } else if let Some(rest) = s.strip_prefix("home_") {
            (Self::Home, rest)
        } else {
            return Err(format!("sensor key \"{s}\" must start with grid_ or home_"));
        };
        // Canonical ids only, so every key has exactly one spelling.
        let canonical = !rest.is_empty()
            && rest.bytes().all(|b| b.is_ascii_digit())
            && (rest == "0" || !rest.starts_with('0'));
        if !canonical {
            return Err(format!("sensor key \"{s}\" has a non-numeric id"));
        }
        rest.parse::<u32>()
            .map(ctor)
            .map_err(|_| format!("sensor key \"{s}\" has an id out of range"))
    }
}

impl Serialize for SensorKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SensorKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
