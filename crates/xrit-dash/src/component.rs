//! Component trait: the interface every dashboard panel implements.
//!
//! Panels read `AppState` and return `Vec<Action>`; they never touch the
//! acquisition controller directly.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;

pub trait Component {
    fn id(&self) -> ComponentId;

    /// Keys not consumed by the global handler are offered to every panel.
    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    /// Called on every clock tick.
    fn tick(&mut self, _state: &AppState) {}

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState);

    /// Rows the panel needs in the layout, including borders.
    fn min_height(&self) -> u16 {
        3
    }
}
