//! Quarantine view rendering.
//!
//! Lists wafers held after a safety interlock, newest first, as the backend
//! returns them.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::quarantine::open_count;
use crate::data::QuarantineEntry;

/// Render the Quarantine view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let Some(ref entries) = app.quarantine else {
        let paragraph = Paragraph::new("Waiting for quarantine log...")
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block.title(" Quarantine "));
        frame.render_widget(paragraph, area);
        return;
    };

    if entries.is_empty() {
        let paragraph = Paragraph::new("No wafers quarantined")
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.nominal))
            .block(block.title(" Quarantine (0) "));
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Time"),
        Cell::from("Wafer"),
        Cell::from("Tool"),
        Cell::from("Metric"),
        Cell::from("Value"),
        Cell::from("Limit"),
        Cell::from("State"),
    ])
    .height(1)
    .style(app.theme.header.add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = entries.iter().map(|entry| entry_row(app, entry)).collect();

    let widths = [
        Constraint::Length(10), // Time
        Constraint::Fill(2),    // Wafer
        Constraint::Fill(2),    // Tool
        Constraint::Fill(2),    // Metric
        Constraint::Length(8),  // Value
        Constraint::Length(8),  // Limit
        Constraint::Length(9),  // State
    ];

    let selected = app.selected_entry.min(entries.len().saturating_sub(1));
    let title = format!(
        " Quarantine ({} open / {}) [{}/{}] ",
        open_count(entries),
        entries.len(),
        selected + 1,
        entries.len()
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(block.title(title))
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

fn entry_row<'a>(app: &App, entry: &'a QuarantineEntry) -> Row<'a> {
    let state_cell = if entry.is_cleared {
        Cell::from("CLEARED").style(Style::default().fg(app.theme.nominal))
    } else {
        Cell::from("OPEN").style(Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD))
    };

    Row::new(vec![
        Cell::from(entry.display_time()),
        Cell::from(entry.wafer_id.as_str()),
        Cell::from(entry.tool_id.as_str()),
        Cell::from(entry.metric_name.as_str()),
        Cell::from(format!("{:.2}", entry.violation_value)),
        Cell::from(
            entry
                .threshold_limit
                .map(|limit| format!("{:.1}", limit))
                .unwrap_or_else(|| "-".to_string()),
        ),
        state_cell,
    ])
}
