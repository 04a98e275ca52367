//! Power-grid digital twin with operator fault injection.

#[cfg(feature = "api")]
pub mod api;
pub mod assets;
pub mod config;
#[cfg(feature = "console")]
pub mod console;
pub mod error;
pub mod io;
pub mod logging;
/// Simulation engine, fault table, clock, and run summaries.
pub mod sim;
#[cfg(feature = "tui")]
pub mod tui;
pub mod twin;
