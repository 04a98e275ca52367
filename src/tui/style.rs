//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

use crate::twin::HealthStatus;

/// Voltage line color.
pub const VOLTAGE_COLOR: Color = Color::Cyan;
/// Expected-voltage line color.
pub const EXPECTED_COLOR: Color = Color::DarkGray;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Active-fault marker color.
pub const FAULT_ACTIVE: Color = Color::Magenta;

/// Dashboard colors: red, orange, green.
pub fn health_color(health: HealthStatus) -> Color {
    match health {
        HealthStatus::Critical => Color::Red,
        HealthStatus::Warning => Color::Rgb(255, 165, 0),
        HealthStatus::Normal => Color::Green,
    }
}

/// Computes Y-axis bounds from chart data points with 10% padding.
pub fn auto_bounds_y(series: &[(f64, f64)], reference: f64) -> [f64; 2] {
    let all = series.iter().map(|&(_, y)| y).chain(std::iter::once(reference));
    let min = all.clone().fold(f64::INFINITY, f64::min);
    let max = all.fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [-1.0, 1.0];
    }
    let range = (max - min).max(1.0);
    let pad = range * 0.1;
    [min - pad, max + pad]
}
