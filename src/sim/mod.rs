/// Fixed-spacing clock for offline runs.
pub mod clock;
pub mod engine;
/// Fault kinds and the per-sensor fault table.
pub mod fault;
pub mod kpi;
/// Scripted fault injection for offline runs.
pub mod schedule;
pub mod types;
