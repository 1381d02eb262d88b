//! Smooth Unicode progress bar widget.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_ACTIVE, C_SECONDARY};

const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Render `percent` (0..=100) as a bar followed by a right-hand label.
pub fn draw_progress(frame: &mut Frame, area: Rect, percent: u8) {
    if area.width < 6 || area.height == 0 {
        return;
    }
    let label = format!(" {:>3}%", percent.min(100));
    let bar_w = (area.width as usize).saturating_sub(label.len()).max(1);
    let line = Line::from(vec![
        Span::styled(bar(percent, bar_w), Style::default().fg(C_ACTIVE)),
        Span::styled(label, Style::default().fg(C_SECONDARY)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Exactly `width` cells, 8 eighths per cell.
pub fn bar(percent: u8, width: usize) -> String {
    let eighths = percent.min(100) as usize * width * 8 / 100;
    let full_blocks = eighths / 8;
    let partial = eighths % 8;

    let mut out = String::with_capacity(width * 3);
    for _ in 0..full_blocks {
        out.push('█');
    }
    if full_blocks < width {
        out.push(BLOCKS[partial]);
        for _ in (full_blocks + 1)..width {
            out.push(' ');
        }
    }
    out
}
