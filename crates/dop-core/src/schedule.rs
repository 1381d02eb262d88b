//! Typed schedule model shared by the parser, selector and controller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Entries ───────────────────────────────────────────────────────────────────

/// One transmission window from the daily operation plan.
///
/// `start`/`end` are zero-padded `HHMMSS` strings. Comparisons between them
/// (and against [`time_stamp`]) are lexicographic, which is only valid
/// because the width is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub start: String,
    pub end: String,
    /// Product code from the last three characters of the code column,
    /// padding trimmed (`"FD "` → `"FD"`).
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    /// Human-readable category column (e.g. "Full Disk").
    pub category: String,
    pub insertion_flag: bool,
}

impl ScheduleEntry {
    pub fn start_display(&self) -> String {
        hhmmss_display(&self.start)
    }

    pub fn end_display(&self) -> String {
        hhmmss_display(&self.end)
    }
}

/// `"HHMMSS"` → `"HH:MM:SS"` by fixed-offset slicing.
pub fn hhmmss_display(s: &str) -> String {
    if s.len() != 6 || !s.is_ascii() {
        return s.to_string();
    }
    format!("{}:{}:{}", &s[0..2], &s[2..4], &s[4..6])
}

/// Ordered entries for a single UTC day. Empty is a valid value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleSet(Vec<ScheduleEntry>);

impl ScheduleSet {
    pub fn new(entries: Vec<ScheduleEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleEntry> {
        self.0.iter()
    }
}

impl FromIterator<ScheduleEntry> for ScheduleSet {
    fn from_iter<I: IntoIterator<Item = ScheduleEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Either a parsed set, or the sentinel for "no usable schedule today".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entries", rename_all = "snake_case")]
pub enum Schedule {
    Entries(ScheduleSet),
    Unavailable,
}

impl Schedule {
    /// Entries to render; the sentinel behaves as an empty slice.
    pub fn entries(&self) -> &[ScheduleEntry] {
        match self {
            Schedule::Entries(set) => set.entries(),
            Schedule::Unavailable => &[],
        }
    }
}

// ── Acquisition state ─────────────────────────────────────────────────────────

/// Where the displayed schedule came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Online,
    Offline,
    Unavailable,
}

impl Provenance {
    /// Short label for badges (≤7 chars).
    pub fn badge_label(&self) -> &'static str {
        match self {
            Provenance::Online => "LIVE",
            Provenance::Offline => "CACHED",
            Provenance::Unavailable => "N/A",
        }
    }
}

/// Acquisition lifecycle.
///
/// Transitions:
///   Empty -> Acquiring -> OnlineReady | OfflineReady | Unavailable
///   (any terminal) -> Acquiring   on retry or UTC day rollover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionStatus {
    #[default]
    Empty,
    Acquiring,
    OnlineReady,
    OfflineReady,
    Unavailable,
}

impl AcquisitionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AcquisitionStatus::OnlineReady
                | AcquisitionStatus::OfflineReady
                | AcquisitionStatus::Unavailable
        )
    }
}

/// Everything the controller knows about today's schedule. Replaced
/// wholesale on retry or rollover, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcquisitionState {
    /// UTC calendar day, `YYYYMMDD`.
    pub date_stamp: String,
    pub downlink: String,
    pub schedule: Schedule,
    pub status: AcquisitionStatus,
    /// Explanation shown alongside an `Unavailable` schedule.
    pub error: Option<String>,
}

impl AcquisitionState {
    pub fn empty() -> Self {
        Self {
            date_stamp: String::new(),
            downlink: String::new(),
            schedule: Schedule::Entries(ScheduleSet::default()),
            status: AcquisitionStatus::Empty,
            error: None,
        }
    }

    pub(crate) fn acquiring(date_stamp: String, downlink: String) -> Self {
        Self {
            date_stamp,
            downlink,
            schedule: Schedule::Entries(ScheduleSet::default()),
            status: AcquisitionStatus::Acquiring,
            error: None,
        }
    }

    pub fn provenance(&self) -> Provenance {
        match self.status {
            AcquisitionStatus::OnlineReady => Provenance::Online,
            AcquisitionStatus::OfflineReady => Provenance::Offline,
            _ => Provenance::Unavailable,
        }
    }
}

// ── Stamps ────────────────────────────────────────────────────────────────────

/// UTC date as `YYYYMMDD`.
pub fn date_stamp(now: &DateTime<Utc>) -> String {
    now.format("%Y%m%d").to_string()
}

/// UTC time-of-day as zero-padded `HHMMSS`.
pub fn time_stamp(now: &DateTime<Utc>) -> String {
    now.format("%H%M%S").to_string()
}
