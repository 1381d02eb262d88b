//! AppState: read-only data handed to every panel during draw.
//!
//! Only the App event loop writes to it, after each tick or message.

use dop_core::clock::ClockReading;
use dop_core::status::{LiveStatus, ReceiverInfo};
use dop_core::window::ScheduleWindow;

pub struct AppState {
    pub clock: ClockReading,
    pub window: ScheduleWindow,
    /// Downlink id the schedule is requested for.
    pub downlink: String,

    // ── Receiver ──────────────────────────────────────────────────────────────
    pub receiver: Option<ReceiverInfo>,
    pub receiver_error: Option<String>,
    pub live: Option<LiveStatus>,
    pub live_error: Option<String>,
}

impl AppState {
    pub fn new(clock: ClockReading, window: ScheduleWindow, downlink: String) -> Self {
        Self {
            clock,
            window,
            downlink,
            receiver: None,
            receiver_error: None,
            live: None,
            live_error: None,
        }
    }
}
