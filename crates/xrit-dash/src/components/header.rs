//! Header component: one-row top bar naming the receiver.
//!
//! Not focusable; draws to a 1-row area.

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
    theme::{C_ACCENT, C_ERROR, C_MUTED, C_PRIMARY, C_SECONDARY},
};

pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }

    fn line(state: &AppState) -> Line<'static> {
        let mut spans = vec![Span::styled(
            " xrit-dash ",
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
        )];

        match (&state.receiver, &state.receiver_error) {
            (Some(info), _) => {
                spans.push(Span::styled(
                    format!(" {} {}", info.spacecraft, info.downlink),
                    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::styled(
                    format!("  xrit-rx v{}", info.version),
                    Style::default().fg(C_SECONDARY),
                ));
            }
            (None, Some(err)) => {
                spans.push(Span::styled(
                    format!(" receiver offline: {}", err),
                    Style::default().fg(C_ERROR),
                ));
            }
            (None, None) => {
                spans.push(Span::styled(
                    " connecting to receiver…",
                    Style::default().fg(C_MUTED),
                ));
            }
        }

        if state.receiver.is_none() && !state.downlink.is_empty() {
            spans.push(Span::styled(
                format!("  downlink {}", state.downlink),
                Style::default().fg(C_SECONDARY),
            ));
        }
        Line::from(spans)
    }
}

impl Component for Header {
    fn id(&self) -> ComponentId {
        ComponentId::Header
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        frame.render_widget(Paragraph::new(Self::line(state)), area);
    }

    fn min_height(&self) -> u16 {
        1
    }
}
