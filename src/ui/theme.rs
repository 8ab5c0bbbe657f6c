//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::ToolHealth;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color of the temperature trend line.
    pub trend: Color,
    /// Color for a critical tool status and the safety limit.
    pub critical: Color,
    /// Color for a nominal tool status.
    pub nominal: Color,
    /// Color for a status the dashboard does not recognize.
    pub unknown: Color,
    /// Color for borders, axes and separators.
    pub border: Color,
    /// Style for card titles and table headers.
    pub header: Style,
    /// Style for fallback values shown before data arrives.
    pub placeholder: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            trend: Color::LightGreen,
            critical: Color::Red,
            nominal: Color::Green,
            unknown: Color::Yellow,
            border: Color::Gray,
            header: Style::default().fg(Color::Gray),
            placeholder: Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            trend: Color::Green,
            critical: Color::Red,
            nominal: Color::Green,
            unknown: Color::Magenta,
            border: Color::DarkGray,
            header: Style::default().fg(Color::DarkGray),
            placeholder: Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a tool health
    pub fn health_style(&self, health: ToolHealth) -> Style {
        match health {
            ToolHealth::Nominal => Style::default().fg(self.nominal),
            ToolHealth::Unknown => Style::default().fg(self.unknown),
            ToolHealth::Critical => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
        }
    }
}
