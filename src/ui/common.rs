//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, help overlay
//! and the reset confirmation dialog.

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::duration::format_age;
use crate::data::quarantine::open_count;
use crate::data::ToolHealth;

/// Render the header bar with tool health and backend.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let health = app.snapshot.as_ref().map(|s| s.health());

    let mut spans = vec![
        Span::styled(
            " ● ",
            health
                .map(|h| app.theme.health_style(h))
                .unwrap_or_else(|| Style::default().add_modifier(Modifier::DIM)),
        ),
        Span::styled(
            "GREENFIELD FAB MONITOR ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some(tool) = app.snapshot.as_ref().and_then(|s| s.tool_id.as_deref()) {
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(
            format!("{} ", tool),
            Style::default().fg(app.theme.highlight),
        ));
    }

    if health == Some(ToolHealth::Critical) {
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(
            "INTERLOCK RISK ",
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        ));
    }

    spans.push(Span::raw("│ "));
    spans.push(Span::styled(
        app.source_description().to_string(),
        Style::default().add_modifier(Modifier::DIM),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let quarantine_label = match app.quarantine {
        Some(ref entries) if open_count(entries) > 0 => {
            format!(" 2:Quarantine ({}) ", open_count(entries))
        }
        _ => " 2:Quarantine ".to_string(),
    };
    let titles: Vec<Line> = vec![Line::from(" 1:Dashboard "), Line::from(quarantine_label)];

    let selected = match app.current_view {
        View::Dashboard => 0,
        View::Quarantine => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows time since the last successful update and the available controls.
/// Temporary status messages (export, reset) take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Dashboard => "Tab:switch r:refresh x:reset e:export ?:help q:quit",
        View::Quarantine => "↑↓:select Tab:switch r:refresh x:reset ?:help q:quit",
    };

    let status = match app.last_updated() {
        Some(at) => format!(
            " {} | Updated {} ago | {}",
            app.current_view.label(),
            format_age(Instant::now().saturating_duration_since(at)),
            controls
        ),
        None => format!(" {} | Connecting... | {}", app.current_view.label(), controls),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.tab_active)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  1/2         Dashboard / Quarantine"),
        Line::from("  ↑/↓ j/k     Select quarantine entry"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Actions",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Refresh now"),
        Line::from("  x         Reset system (confirm)"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);
    let help_area = centered(area, 42, 19);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Render the reset confirmation dialog.
pub fn render_confirm_reset(frame: &mut Frame, app: &App, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Reset the tool interlock state?",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("y: confirm    any other key: cancel"),
    ];

    let block = Block::default()
        .title(" System Reset ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.critical));

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(block);
    let dialog_area = centered(area, 44, 6);

    frame.render_widget(Clear, dialog_area);
    frame.render_widget(paragraph, dialog_area);
}

/// A rectangle of at most `width` x `height` centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
