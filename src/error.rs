//! Library error type.

use thiserror::Error;

use crate::assets::SensorKey;
use crate::sim::fault::FaultKind;

/// Errors raised by the twin engine and its I/O helpers.
#[derive(Error, Debug)]
pub enum TwinError {
    #[error("unknown target {0}")]
    UnknownTarget(SensorKey),

    #[error("fault \"{kind}\" can only be injected into a smart home, not {target}")]
    FaultNotApplicable { kind: FaultKind, target: SensorKey },

    #[error("fault duration must be between 1 and {max}s, got {got}s")]
    InvalidDuration { got: u64, max: u64 },

    #[error("invalid fault script \"{script}\": {message}")]
    InvalidScript { script: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, TwinError>;
