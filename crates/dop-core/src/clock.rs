//! Time source seam and the live clock strings shown by the dashboard.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::schedule::{date_stamp, time_stamp};

/// Where "now" comes from. The controller never reads the system clock
/// directly so rollover and windowing can be driven from tests.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Snapshot of the clock panel contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockReading {
    /// `HH:MM:SS` UTC.
    pub utc: String,
    /// `HH:MM:SS` in the host's local zone.
    pub local: String,
    pub date_stamp: String,
    pub time_stamp: String,
}

impl ClockReading {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            utc: instant.format("%H:%M:%S").to_string(),
            local: instant.with_timezone(&Local).format("%H:%M:%S").to_string(),
            date_stamp: date_stamp(&instant),
            time_stamp: time_stamp(&instant),
        }
    }
}
