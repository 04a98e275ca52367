//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Cell, Chart, Dataset, Paragraph, Row, Table};

use super::runtime::App;
use super::style;
use crate::assets::AssetKind;
use crate::twin::HealthStatus;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let table_height = app.rows.len() as u16 + 3;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // header
            Constraint::Length(table_height), // asset table
            Constraint::Min(8),               // chart
            Constraint::Length(1),            // last action
            Constraint::Length(1),            // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_table(frame, app, chunks[1]);
    render_chart(frame, app, chunks[2]);
    render_message(frame, app, chunks[3]);
    render_footer(frame, chunks[4]);
}

/// Header bar: sim time, speed, run state, live fault count.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (state_icon, state_label) = if app.paused {
        ("‖", "PAUSED")
    } else {
        ("▶", "RUNNING")
    };

    let faults = app.active_fault_count();
    let fault_style = if faults > 0 {
        Style::default()
            .fg(style::FAULT_ACTIVE)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(style::FOOTER_FG)
    };

    let header = Line::from(vec![
        Span::styled(
            " GRID-TWIN ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " │ t={:.0}s │ {}ms │ {} {} │ ",
            app.sim_time_s,
            app.tick_interval_ms(),
            state_icon,
            state_label,
        )),
        Span::styled(format!("faults: {faults}"), fault_style),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn status_label(kind: AssetKind, health: HealthStatus) -> &'static str {
    match (kind, health) {
        (AssetKind::SmartHome, HealthStatus::Critical) => "PROTECTION ACTIVE",
        _ => health.label(),
    }
}

/// Asset table, one row per sensor, coloured by health.
fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(["Sensor", "Asset", "Real V", "Expected V", "Load A", "Status", "Fault"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = app.rows.iter().enumerate().map(|(i, r)| {
        let mut row_style = Style::default();
        if i == app.selected {
            row_style = row_style.add_modifier(Modifier::REVERSED);
        }
        Row::new(vec![
            Cell::from(r.id.to_string()),
            Cell::from(r.name.clone()),
            Cell::from(format!("{:>10.2}", r.real_value)),
            Cell::from(format!("{:>10.2}", r.expected_value)),
            Cell::from(format!("{:>6.2}", r.load_amps)),
            Cell::from(status_label(r.kind, r.health_status))
                .style(Style::default().fg(style::health_color(r.health_status))),
            Cell::from(r.fault.map(|f| f.label()).unwrap_or("")),
        ])
        .style(row_style)
    });

    let widths = [
        Constraint::Length(8),
        Constraint::Min(20),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(7),
        Constraint::Length(18),
        Constraint::Length(14),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(" Assets ").borders(Borders::ALL));
    frame.render_widget(table, area);
}

/// Voltage history of the selected asset against its expected value.
fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let voltage = app.selected_history();
    let (title, expected) = app.selected_row().map_or_else(
        || (" Voltage ".to_string(), 0.0),
        |r| (format!(" {} ({}) ", r.name, r.id), r.expected_value),
    );

    let x_lo = voltage.first().map_or(0.0, |p| p.0);
    let x_hi = voltage.last().map_or(1.0, |p| p.0).max(x_lo + 1.0);
    let expected_line = [(x_lo, expected), (x_hi, expected)];
    let y_bounds = style::auto_bounds_y(&voltage, expected);

    let datasets = vec![
        Dataset::default()
            .name("Real")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::VOLTAGE_COLOR))
            .data(&voltage),
        Dataset::default()
            .name("Expected")
            .marker(symbols::Marker::Dot)
            .style(Style::default().fg(style::EXPECTED_COLOR))
            .data(&expected_line),
    ];

    let chart = Chart::new(datasets)
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title("s")
                .bounds([x_lo, x_hi])
                .labels(vec![format!("{x_lo:.0}"), format!("{x_hi:.0}")]),
        )
        .y_axis(
            Axis::default()
                .title("V")
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.1}", y_bounds[0]),
                    format!("{:.1}", y_bounds[1]),
                ]),
        );

    frame.render_widget(chart, area);
}

fn render_message(frame: &mut Frame, app: &App, area: Rect) {
    let text = match (&app.message, app.selected_row()) {
        (Some(msg), _) => format!(" {msg}"),
        (None, Some(r)) => format!(" {}", r.recommendation),
        (None, None) => String::new(),
    };
    frame.render_widget(Paragraph::new(text), area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  Space:Pause  +/-:Speed  ↑/↓:Select  d/s/z:Dip/Spike/Zero  g/w:Surge/Wear  c:Clear",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
