//! Schedule component: today's DOP window around the current time.
//!
//! Rows are `HH:MM:SS–HH:MM:SS  id  type  category`, coloured by activation
//! state. A provenance badge marks whether the plan is live or cached.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use dop_core::schedule::{AcquisitionStatus, Provenance};
use dop_core::window::{EntryState, ScheduleWindow, WindowEntry};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        style_active, style_default, style_error, style_muted, style_secondary, C_BADGE_CACHED,
        C_BADGE_ERR, C_BADGE_LIVE, C_INSERTION, C_PENDING, C_TAG,
    },
    widgets::pane_chrome::{pane_chrome, Badge},
};

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub struct SchedulePanel {
    spinner: usize,
}

impl SchedulePanel {
    pub fn new() -> Self {
        Self { spinner: 0 }
    }

    fn badge(window: &ScheduleWindow) -> Option<Badge<'static>> {
        match window.status {
            AcquisitionStatus::Empty => None,
            AcquisitionStatus::Acquiring => Some(Badge {
                text: "…",
                color: C_PENDING,
            }),
            _ => {
                let color = match window.provenance {
                    Provenance::Online => C_BADGE_LIVE,
                    Provenance::Offline => C_BADGE_CACHED,
                    Provenance::Unavailable => C_BADGE_ERR,
                };
                Some(Badge {
                    text: window.provenance.badge_label(),
                    color,
                })
            }
        }
    }
}

/// `20240307` -> `2024-03-07`; anything else is returned unchanged.
fn date_display(stamp: &str) -> String {
    if stamp.len() == 8 && stamp.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}-{}-{}", &stamp[..4], &stamp[4..6], &stamp[6..])
    } else {
        stamp.to_string()
    }
}

fn row_line(row: &WindowEntry) -> Line<'static> {
    let (marker, time_style, text_style) = match row.state {
        EntryState::Past => ("  ", style_muted(), style_muted()),
        EntryState::Active => ("▶ ", style_active(), style_active()),
        EntryState::Future => ("  ", style_secondary(), style_default()),
    };
    let e = &row.entry;
    let mut spans = vec![
        Span::styled(format!(" {}", marker), text_style),
        Span::styled(
            format!("{}–{}", e.start_display(), e.end_display()),
            time_style,
        ),
        Span::styled(format!("  {:<6}", e.id), text_style),
        Span::styled(
            format!("{:<4}", e.kind),
            if row.state == EntryState::Past {
                style_muted()
            } else {
                Style::default().fg(C_TAG)
            },
        ),
        Span::styled(e.category.clone(), text_style),
    ];
    if e.insertion_flag {
        spans.push(Span::styled(
            "  ◆".to_string(),
            if row.state == EntryState::Past {
                style_muted()
            } else {
                Style::default().fg(C_INSERTION)
            },
        ));
    }
    Line::from(spans)
}

/// Panel body for `window`. `spinner` selects the in-flight glyph.
pub fn body_lines(window: &ScheduleWindow, spinner: usize) -> Vec<Line<'static>> {
    match window.status {
        AcquisitionStatus::Empty => vec![Line::from(Span::styled(
            " waiting for receiver…",
            style_muted(),
        ))],
        AcquisitionStatus::Acquiring => vec![Line::from(vec![
            Span::styled(
                format!(" {} ", SPINNER[spinner % SPINNER.len()]),
                Style::default().fg(C_PENDING),
            ),
            Span::styled("acquiring…", style_secondary()),
        ])],
        AcquisitionStatus::Unavailable => {
            let reason = window
                .error
                .clone()
                .unwrap_or_else(|| "schedule unavailable".to_string());
            vec![
                Line::from(Span::styled(" Schedule unavailable", style_error())),
                Line::from(Span::styled(format!(" {}", reason), style_secondary())),
                Line::from(""),
                Line::from(Span::styled(" press r to retry", style_muted())),
            ]
        }
        AcquisitionStatus::OnlineReady | AcquisitionStatus::OfflineReady => {
            window.entries.iter().map(row_line).collect()
        }
    }
}

impl Component for SchedulePanel {
    fn id(&self) -> ComponentId {
        ComponentId::Schedule
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        match key.code {
            KeyCode::Char('r') if key.modifiers == KeyModifiers::NONE => vec![Action::Retry],
            _ => Vec::new(),
        }
    }

    fn tick(&mut self, state: &AppState) {
        if state.window.status == AcquisitionStatus::Acquiring {
            self.spinner = self.spinner.wrapping_add(1);
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let window = &state.window;
        let title = if window.date_stamp.is_empty() {
            "Schedule".to_string()
        } else {
            format!("Schedule {}", date_display(&window.date_stamp))
        };
        let block = pane_chrome(&title, Self::badge(window));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(body_lines(window, self.spinner)), inner);
    }

    fn min_height(&self) -> u16 {
        6
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dop_core::schedule::ScheduleEntry;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn window(status: AcquisitionStatus, provenance: Provenance) -> ScheduleWindow {
        ScheduleWindow {
            date_stamp: "20240307".to_string(),
            provenance,
            status,
            error: None,
            first_index: 0,
            entries: Vec::new(),
        }
    }

    fn row(start: &str, end: &str, state: EntryState) -> WindowEntry {
        WindowEntry {
            index: 0,
            entry: ScheduleEntry {
                start: start.to_string(),
                end: end.to_string(),
                kind: "FD".to_string(),
                id: "ABC".to_string(),
                category: "Full Disk".to_string(),
                insertion_flag: false,
            },
            state,
        }
    }

    #[test]
    fn test_date_display() {
        assert_eq!(date_display("20240307"), "2024-03-07");
        assert_eq!(date_display(""), "");
    }

    #[test]
    fn test_rows_render_times_and_codes() {
        let mut w = window(AcquisitionStatus::OnlineReady, Provenance::Online);
        w.entries = vec![
            row("000000", "001000", EntryState::Past),
            row("001000", "002000", EntryState::Active),
        ];
        let lines = body_lines(&w, 0);
        assert_eq!(lines.len(), 2);
        assert!(text(&lines[0]).contains("00:00:00–00:10:00"));
        assert!(text(&lines[1]).starts_with(" ▶ 00:10:00–00:20:00"));
        assert!(text(&lines[1]).contains("ABC"));
        assert!(text(&lines[1]).contains("Full Disk"));
    }

    #[test]
    fn test_unavailable_offers_retry() {
        let mut w = window(AcquisitionStatus::Unavailable, Provenance::Unavailable);
        w.error = Some("primary: HTTP 503; fallback: HTTP 404".to_string());
        let lines: Vec<String> = body_lines(&w, 0).iter().map(text).collect();
        assert!(lines.iter().any(|l| l.contains("HTTP 503")));
        assert!(lines.iter().any(|l| l.contains("press r to retry")));
        assert_eq!(SchedulePanel::badge(&w).map(|b| b.text), Some("N/A"));
    }

    #[test]
    fn test_acquiring_is_not_an_error() {
        let w = window(AcquisitionStatus::Acquiring, Provenance::Unavailable);
        let lines = body_lines(&w, 3);
        assert_eq!(lines.len(), 1);
        assert!(text(&lines[0]).contains("acquiring…"));
        assert_eq!(SchedulePanel::badge(&w).map(|b| b.text), Some("…"));
    }

    #[test]
    fn test_badge_follows_provenance() {
        let w = window(AcquisitionStatus::OfflineReady, Provenance::Offline);
        assert_eq!(SchedulePanel::badge(&w).map(|b| b.text), Some("CACHED"));
        let w = window(AcquisitionStatus::Empty, Provenance::Unavailable);
        assert!(SchedulePanel::badge(&w).is_none());
    }

    #[test]
    fn test_r_requests_retry() {
        let mut panel = SchedulePanel::new();
        let state = AppState::new(
            dop_core::clock::ClockReading::at(chrono::Utc::now()),
            window(AcquisitionStatus::Unavailable, Provenance::Unavailable),
            "LRIT".to_string(),
        );
        let key = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(panel.handle_key(key, &state), vec![Action::Retry]);
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert!(panel.handle_key(key, &state).is_empty());
    }
}
