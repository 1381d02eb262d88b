pub mod clock;
pub mod header;
pub mod schedule_panel;
pub mod status_panel;
