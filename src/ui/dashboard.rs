//! Dashboard view: status cards above the yield chart.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};

use super::card::CARD_HEIGHT;
use crate::app::App;

/// Render the Dashboard view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [cards_area, chart_area] =
        Layout::vertical([Constraint::Length(CARD_HEIGHT), Constraint::Min(6)]).areas(area);

    let cards = app.status_cards();
    let slots = Layout::horizontal([Constraint::Fill(1); 3]).spacing(1).split(cards_area);
    for (card, slot) in cards.iter().zip(slots.iter()) {
        frame.render_widget(card.widget(&app.theme), *slot);
    }

    super::chart::render(frame, app, chart_area);
}
