//! File output for offline runs.

pub mod export;
