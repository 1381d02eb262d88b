//! UTC day rollover detection.

use chrono::{DateTime, Utc};

use crate::schedule::date_stamp;

/// Fires once per UTC date change.
///
/// The monitor remembers the last date it has acted on, so several ticks
/// observing the same new date (while re-acquisition is still in flight)
/// produce a single trigger.
#[derive(Debug, Clone, Default)]
pub struct RolloverMonitor {
    seen: Option<String>,
}

impl RolloverMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `date_stamp` as already handled (initial acquisition, retry).
    pub fn mark(&mut self, date_stamp: &str) {
        self.seen = Some(date_stamp.to_string());
    }

    /// Returns the new date stamp when `now` falls on a different UTC day
    /// than both `current` and the last triggered date.
    pub fn check(&mut self, current: &str, now: &DateTime<Utc>) -> Option<String> {
        let today = date_stamp(now);
        if today == current || self.seen.as_deref() == Some(today.as_str()) {
            return None;
        }
        self.seen = Some(today.clone());
        Some(today)
    }
}
