//! Monitored assets: kinds, sensor keys, the registry, and load profiles.

/// Stochastic current-draw profiles per asset kind.
pub mod load;
pub mod registry;
pub mod types;

pub use load::LoadProfile;
pub use registry::{AssetRef, GridAsset, Registry, SmartHome};
pub use types::{AssetKind, SensorKey};
