//! Schedule window selection: which entries to show right now, and how.

use serde::Serialize;

use crate::schedule::{AcquisitionState, AcquisitionStatus, Provenance, ScheduleEntry};

/// Entries that started before the first upcoming one and stay visible.
const LOOK_BACK: usize = 3;

/// Activation state of a windowed entry relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    Past,
    Active,
    Future,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowEntry {
    /// Index into the full day's set.
    pub index: usize,
    pub entry: ScheduleEntry,
    pub state: EntryState,
}

/// The slice of today's schedule handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleWindow {
    pub date_stamp: String,
    pub provenance: Provenance,
    pub status: AcquisitionStatus,
    pub error: Option<String>,
    pub first_index: usize,
    pub entries: Vec<WindowEntry>,
}

impl ScheduleWindow {
    /// Window for the current acquisition state. An in-flight or failed
    /// acquisition yields an empty window.
    pub fn from_state(state: &AcquisitionState, now: &str, window_size: usize) -> Self {
        let entries = state.schedule.entries();
        let first_index = first_visible_index(entries, now, window_size);
        Self {
            date_stamp: state.date_stamp.clone(),
            provenance: state.provenance(),
            status: state.status,
            error: state.error.clone(),
            first_index,
            entries: select(entries, now, window_size),
        }
    }

    pub fn active(&self) -> Option<&WindowEntry> {
        self.entries.iter().find(|e| e.state == EntryState::Active)
    }
}

/// First entry to show for `now` (`HHMMSS`).
///
/// Three entries of look-back before the first entry starting after `now`.
/// Once every entry has started, the last `window_size` entries are shown.
pub fn first_visible_index(entries: &[ScheduleEntry], now: &str, window_size: usize) -> usize {
    match entries.iter().position(|e| e.start.as_str() > now) {
        Some(next) => next.saturating_sub(LOOK_BACK),
        None => entries.len().saturating_sub(window_size.max(1)),
    }
}

/// Visible slice of `entries` at `now`, each classified.
pub fn select(entries: &[ScheduleEntry], now: &str, window_size: usize) -> Vec<WindowEntry> {
    let first = first_visible_index(entries, now, window_size);
    let last = first.saturating_add(window_size).min(entries.len());

    entries[first..last]
        .iter()
        .enumerate()
        .map(|(offset, entry)| {
            let index = first + offset;
            WindowEntry {
                index,
                state: classify(entry, now, index + 1 == entries.len()),
                entry: entry.clone(),
            }
        })
        .collect()
}

/// The day's final entry is never `Past`; it stays as the trailing row.
pub fn classify(entry: &ScheduleEntry, now: &str, is_last: bool) -> EntryState {
    if now > entry.end.as_str() && !is_last {
        EntryState::Past
    } else if entry.start.as_str() < now && now < entry.end.as_str() {
        EntryState::Active
    } else {
        EntryState::Future
    }
}
