//! PaneChrome: bordered pane with a title and an optional status badge.

use crate::theme::{style_border, C_PRIMARY};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

/// A badge shown in the top-right of the pane header (e.g. "LIVE", "N/A").
pub struct Badge<'a> {
    pub text: &'a str,
    pub color: Color,
}

pub fn pane_chrome<'a>(title: &'a str, badge: Option<Badge<'a>>) -> Block<'a> {
    let title_style = Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style_border())
        .title(Line::from(Span::styled(format!(" {} ", title), title_style)));

    if let Some(b) = badge {
        block.title_top(
            Line::from(Span::styled(
                format!(" {} ", b.text),
                Style::default().fg(b.color).add_modifier(Modifier::BOLD),
            ))
            .right_aligned(),
        )
    } else {
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::C_PANEL_BORDER;
    use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

    fn render(block: Block<'_>) -> Buffer {
        let area = Rect::new(0, 0, 24, 3);
        let mut buf = Buffer::empty(area);
        block.render(area, &mut buf);
        buf
    }

    fn top_row(buf: &Buffer) -> String {
        (0..buf.area.width).map(|x| buf[(x, 0)].symbol()).collect()
    }

    #[test]
    fn test_every_pane_shares_one_border() {
        let plain = render(pane_chrome("Time", None));
        let badged = render(pane_chrome(
            "Schedule",
            Some(Badge {
                text: "LIVE",
                color: Color::Green,
            }),
        ));
        assert_eq!(plain[(0, 1)].fg, C_PANEL_BORDER);
        assert_eq!(badged[(0, 1)].fg, C_PANEL_BORDER);
    }

    #[test]
    fn test_title_and_badge_in_header() {
        let buf = render(pane_chrome(
            "Schedule",
            Some(Badge {
                text: "CACHED",
                color: Color::Yellow,
            }),
        ));
        let top = top_row(&buf);
        assert!(top.contains(" Schedule "));
        assert!(top.contains(" CACHED "));
    }
}
