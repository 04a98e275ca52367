use serde::Serialize;
use tracing::info;

use super::types::{AssetKind, SensorKey};
use crate::config::TwinConfig;

/// A generation, transmission, or distribution asset on the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridAsset {
    pub id: u32,
    pub name: String,
    pub kind: AssetKind,
    /// Nameplate voltage (V).
    pub rated_voltage: f64,
    /// Series impedance used for the voltage-drop model (Ω).
    pub impedance: f64,
}

/// A residential smart-home connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmartHome {
    pub id: u32,
    pub address: String,
    pub owner: String,
}

/// One registry entry, borrowed for iteration in display order.
#[derive(Debug, Clone, Copy)]
pub enum AssetRef<'a> {
    Grid(&'a GridAsset),
    Home(&'a SmartHome),
}

impl AssetRef<'_> {
    pub fn key(&self) -> SensorKey {
        match self {
            Self::Grid(a) => SensorKey::Grid(a.id),
            Self::Home(h) => SensorKey::Home(h.id),
        }
    }

    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Grid(a) => a.kind,
            Self::Home(_) => AssetKind::SmartHome,
        }
    }

    /// Display name: asset name for grid assets, street address for homes.
    pub fn name(&self) -> &str {
        match self {
            Self::Grid(a) => &a.name,
            Self::Home(h) => &h.address,
        }
    }
}

/// Static inventory of every monitored asset.
///
/// Grid assets and homes are numbered from 1 in insertion order, each in
/// its own ID space.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    grid: Vec<GridAsset>,
    homes: Vec<SmartHome>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a registry from the `[[assets]]` and `[[homes]]` tables.
    pub fn from_config(cfg: &TwinConfig) -> Self {
        let mut registry = Self::new();
        for a in &cfg.assets {
            registry.add_grid(&a.name, a.kind, a.rated_voltage, a.impedance);
        }
        for h in &cfg.homes {
            registry.add_home(&h.address, &h.owner);
        }
        info!(
            grid_assets = registry.grid.len(),
            smart_homes = registry.homes.len(),
            "seeded asset registry"
        );
        registry
    }

    /// Appends a grid asset and returns its assigned ID.
    pub fn add_grid(
        &mut self,
        name: &str,
        kind: AssetKind,
        rated_voltage: f64,
        impedance: f64,
    ) -> u32 {
        let id = self.grid.len() as u32 + 1;
        self.grid.push(GridAsset {
            id,
            name: name.to_string(),
            kind,
            rated_voltage,
            impedance,
        });
        id
    }

    /// Appends a smart home and returns its assigned ID.
    pub fn add_home(&mut self, address: &str, owner: &str) -> u32 {
        let id = self.homes.len() as u32 + 1;
        self.homes.push(SmartHome {
            id,
            address: address.to_string(),
            owner: owner.to_string(),
        });
        id
    }

    pub fn grid(&self, id: u32) -> Option<&GridAsset> {
        self.grid.iter().find(|a| a.id == id)
    }

    pub fn home(&self, id: u32) -> Option<&SmartHome> {
        self.homes.iter().find(|h| h.id == id)
    }

    pub fn get(&self, key: SensorKey) -> Option<AssetRef<'_>> {
        match key {
            SensorKey::Grid(id) => self.grid(id).map(AssetRef::Grid),
            SensorKey::Home(id) => self.home(id).map(AssetRef::Home),
        }
    }

    pub fn contains(&self, key: SensorKey) -> bool {
        self.get(key).is_some()
    }

    pub fn grid_assets(&self) -> &[GridAsset] {
        &self.grid
    }

    pub fn homes(&self) -> &[SmartHome] {
        &self.homes
    }

    /// Iterates grid assets first, then homes.
    pub fn iter(&self) -> impl Iterator<Item = AssetRef<'_>> {
        self.grid
            .iter()
            .map(AssetRef::Grid)
            .chain(self.homes.iter().map(AssetRef::Home))
    }

    pub fn len(&self) -> usize {
        self.grid.len() + self.homes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
