//! Status card: a bordered title/value pair.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::Theme;
use crate::data::ToolHealth;

/// Rows a card needs: two lines of text inside a border.
pub const CARD_HEIGHT: u16 = 4;

/// What a status card shows.
///
/// A card is a pure function of its title and value; `placeholder` marks a
/// fallback value shown before any data arrived, so it can be told apart
/// from a real reading that happens to look the same.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusCard {
    pub title: &'static str,
    pub value: String,
    pub placeholder: bool,
    /// Tints the value when set (tool status card).
    pub health: Option<ToolHealth>,
}

impl StatusCard {
    /// A card showing a real value.
    pub fn new(title: &'static str, value: impl Into<String>) -> Self {
        Self {
            title,
            value: value.into(),
            placeholder: false,
            health: None,
        }
    }

    /// A card showing a fallback value.
    pub fn placeholder(title: &'static str, value: impl Into<String>) -> Self {
        Self {
            placeholder: true,
            ..Self::new(title, value)
        }
    }

    /// Tint the value by tool health.
    pub fn with_health(mut self, health: ToolHealth) -> Self {
        self.health = Some(health);
        self
    }

    /// Bind the card to a theme for rendering.
    pub fn widget<'a>(&'a self, theme: &'a Theme) -> StatusCardWidget<'a> {
        StatusCardWidget { card: self, theme }
    }
}

/// Renderable view of a [`StatusCard`].
pub struct StatusCardWidget<'a> {
    card: &'a StatusCard,
    theme: &'a Theme,
}

impl Widget for StatusCardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let value_style = if self.card.placeholder {
            self.theme.placeholder
        } else if let Some(health) = self.card.health {
            self.theme.health_style(health).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        let lines = vec![
            Line::styled(self.card.title.to_uppercase(), self.theme.header),
            Line::styled(self.card.value.clone(), value_style),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(self.theme.border_type)
            .border_style(Style::default().fg(self.theme.border));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
