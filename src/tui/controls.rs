//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;
use crate::sim::fault::FaultKind;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Char(' ') => app.toggle_pause(),
        KeyCode::Char('+' | '=') | KeyCode::Right => app.speed_up(),
        KeyCode::Char('-') | KeyCode::Left => app.speed_down(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Char('d') => app.inject(FaultKind::VoltageDip),
        KeyCode::Char('s') => app.inject(FaultKind::VoltageSpike),
        KeyCode::Char('z') => app.inject(FaultKind::ZeroVoltage),
        KeyCode::Char('g') => app.inject(FaultKind::GridSurge),
        KeyCode::Char('w') => app.inject(FaultKind::HomeWear),
        KeyCode::Char('c') => app.clear_selected(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TwinConfig;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn keys_drive_selection_and_faults() {
        let mut app = App::new(&TwinConfig::bulawayo());
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.active_fault_count(), 1);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.active_fault_count(), 0);
    }

    #[test]
    fn ctrl_c_quits_but_plain_c_clears() {
        let mut app = App::new(&TwinConfig::bulawayo());
        press(&mut app, KeyCode::Char('c'));
        assert!(!app.quit);
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.quit);
    }
}
