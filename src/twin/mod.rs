//! Digital-twin model: expected behavior versus sensor readings.

pub mod model;

pub use model::{HealthStatus, HomeStatus, TwinModel, expected_voltage};
