pub mod pane_chrome;
pub mod progress_bar;
