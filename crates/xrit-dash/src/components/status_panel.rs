//! Status component: what the receiver is demultiplexing right now.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::ComponentId,
    app_state::AppState,
    component::Component,
    theme::{style_default, style_error, style_muted, style_secondary, C_BADGE_ERR, C_BADGE_LIVE, C_TAG},
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        progress_bar::draw_progress,
    },
};

/// GK-2A virtual channel names.
pub fn vcid_label(vcid: i64) -> &'static str {
    match vcid {
        0 => "Full Disk",
        4 => "Alpha-numeric Text",
        5 => "Additional Data",
        63 => "Idle",
        _ => "Unknown",
    }
}

/// Last path component of an image path, for narrow panes.
fn image_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

pub struct StatusPanel;

impl StatusPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Component for StatusPanel {
    fn id(&self) -> ComponentId {
        ComponentId::Status
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let badge = match (&state.live, &state.live_error) {
            (_, Some(_)) => Some(Badge {
                text: "ERR",
                color: C_BADGE_ERR,
            }),
            (Some(_), None) => Some(Badge {
                text: "RX",
                color: C_BADGE_LIVE,
            }),
            (None, None) => None,
        };
        let block = pane_chrome("Receiver", badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        if let Some(err) = &state.live_error {
            let lines = vec![
                Line::from(Span::styled(" status unavailable", style_error())),
                Line::from(Span::styled(format!(" {}", err), style_secondary())),
            ];
            frame.render_widget(Paragraph::new(lines), inner);
            return;
        }
        let Some(live) = &state.live else {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(" waiting for status…", style_muted()))),
                inner,
            );
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let vcid = Line::from(vec![
            Span::styled(" VCID ", style_secondary()),
            Span::styled(format!("{:<3}", live.vcid), style_default()),
            Span::styled(vcid_label(live.vcid), Style::default().fg(C_TAG)),
        ]);
        frame.render_widget(Paragraph::new(vcid), rows[0]);

        let bar_area = Rect {
            x: rows[1].x + 1,
            width: rows[1].width.saturating_sub(2),
            ..rows[1]
        };
        draw_progress(frame, bar_area, live.progress);

        let image = match &live.image {
            Some(path) => Line::from(vec![
                Span::styled(" Last ", style_secondary()),
                Span::styled(image_name(path).to_string(), style_default()),
            ]),
            None => Line::from(Span::styled(" no images yet", style_muted())),
        };
        frame.render_widget(Paragraph::new(image), rows[2]);
    }

    fn min_height(&self) -> u16 {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vcid_labels() {
        assert_eq!(vcid_label(0), "Full Disk");
        assert_eq!(vcid_label(63), "Idle");
        assert_eq!(vcid_label(-1), "Unknown");
    }

    #[test]
    fn test_image_name() {
        assert_eq!(
            image_name("received/LRIT/20240307/FD/IMG_FD_047_IR105_20240307_000000.jpg"),
            "IMG_FD_047_IR105_20240307_000000.jpg"
        );
        assert_eq!(image_name("C:\\rx\\img.png"), "img.png");
        assert_eq!(image_name("plain.jpg"), "plain.jpg");
    }
}
