//! Clock component: live UTC and local time.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::ComponentId,
    app_state::AppState,
    component::Component,
    theme::{C_PRIMARY, C_SECONDARY},
    widgets::pane_chrome::pane_chrome,
};

pub struct ClockPanel;

impl ClockPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Component for ClockPanel {
    fn id(&self) -> ComponentId {
        ComponentId::Clock
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let block = pane_chrome("Time", None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let row = |label: &'static str, value: &str| {
            Line::from(vec![
                Span::styled(format!(" {:<6}", label), Style::default().fg(C_SECONDARY)),
                Span::styled(
                    value.to_string(),
                    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
                ),
            ])
        };
        let lines = vec![
            row("UTC", &state.clock.utc),
            row("Local", &state.clock.local),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn min_height(&self) -> u16 {
        4
    }
}
