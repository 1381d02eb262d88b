//! AcquisitionController: single owner of today's schedule state.
//!
//! The controller never blocks its owner on the network. An acquisition is
//! split in two halves so the fetch can run as a spawned task while the
//! owner keeps ticking:
//!
//! 1. [`AcquisitionController::begin`] replaces the state with `Acquiring`
//!    and hands back an [`AcquisitionTicket`].
//! 2. The ticket is run through [`fetch`] (with a hard timeout) anywhere.
//! 3. [`AcquisitionController::complete`] folds the outcome back in. Tickets
//!    superseded by a later retry or rollover are ignored.
//!
//! [`AcquisitionController::acquire`] chains all three for callers that can
//! simply await.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::AcquireError;
use crate::parser;
use crate::rollover::RolloverMonitor;
use crate::schedule::{
    date_stamp, time_stamp, AcquisitionState, AcquisitionStatus, Provenance, Schedule,
};
use crate::source::{Acquired, ScheduleFetch};
use crate::window::ScheduleWindow;

/// One in-flight acquisition request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionTicket {
    generation: u64,
    pub date_stamp: String,
    pub downlink: String,
}

impl AcquisitionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Run one ticket against `source`, bounded by `timeout`.
pub async fn fetch<S: ScheduleFetch>(
    source: &S,
    ticket: &AcquisitionTicket,
    timeout: Duration,
) -> Result<Acquired, AcquireError> {
    let acquire = source.acquire(&ticket.date_stamp, &ticket.downlink);
    match tokio::time::timeout(timeout, acquire).await {
        Ok(result) => result.map_err(AcquireError::from),
        Err(_) => Err(AcquireError::Timeout(timeout)),
    }
}

pub struct AcquisitionController<S> {
    source: S,
    state: AcquisitionState,
    monitor: RolloverMonitor,
    downlink: String,
    window_size: usize,
    timeout: Duration,
    generation: u64,
}

impl<S: ScheduleFetch> AcquisitionController<S> {
    pub fn new(
        source: S,
        downlink: impl Into<String>,
        window_size: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            state: AcquisitionState::empty(),
            monitor: RolloverMonitor::new(),
            downlink: downlink.into(),
            window_size: window_size.max(1),
            timeout,
            generation: 0,
        }
    }

    pub fn state(&self) -> &AcquisitionState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn downlink(&self) -> &str {
        &self.downlink
    }

    /// Takes effect on the next acquisition.
    pub fn set_downlink(&mut self, downlink: impl Into<String>) {
        self.downlink = downlink.into();
    }

    /// Discard the current state and start acquiring for `now`'s UTC day.
    pub fn begin(&mut self, now: &DateTime<Utc>) -> AcquisitionTicket {
        let today = date_stamp(now);
        self.generation += 1;
        self.monitor.mark(&today);
        self.state = AcquisitionState::acquiring(today.clone(), self.downlink.clone());
        info!(
            "[dop] acquiring schedule for {} {} (generation {})",
            today, self.downlink, self.generation
        );
        AcquisitionTicket {
            generation: self.generation,
            date_stamp: today,
            downlink: self.downlink.clone(),
        }
    }

    /// Manual retry from any state.
    pub fn retry(&mut self, now: &DateTime<Utc>) -> AcquisitionTicket {
        info!("[dop] manual retry requested in state {:?}", self.state.status);
        self.begin(now)
    }

    /// Render-tick hook. Returns a ticket when `now` has crossed into a new
    /// UTC day; at most once per date change.
    pub fn on_tick(&mut self, now: &DateTime<Utc>) -> Option<AcquisitionTicket> {
        if self.state.status == AcquisitionStatus::Empty {
            return None;
        }
        let today = self.monitor.check(&self.state.date_stamp, now)?;
        info!(
            "[dop] UTC day rolled over {} -> {}, reloading schedule",
            self.state.date_stamp, today
        );
        Some(self.begin(now))
    }

    /// Fold a finished fetch into the state. Returns `false` when the ticket
    /// was superseded and the outcome was dropped.
    pub fn complete(
        &mut self,
        ticket: &AcquisitionTicket,
        outcome: Result<Acquired, AcquireError>,
    ) -> bool {
        if ticket.generation != self.generation
            || self.state.status != AcquisitionStatus::Acquiring
        {
            debug!(
                "[dop] dropping stale acquisition result (generation {}, current {})",
                ticket.generation, self.generation
            );
            return false;
        }

        let date_stamp = ticket.date_stamp.clone();
        let downlink = ticket.downlink.clone();
        self.state = match outcome.and_then(resolve) {
            Ok((schedule, status)) => {
                info!(
                    "[dop] schedule ready: {} entries ({:?})",
                    schedule.entries().len(),
                    status
                );
                AcquisitionState {
                    date_stamp,
                    downlink,
                    schedule,
                    status,
                    error: None,
                }
            }
            Err(e) => {
                warn!("[dop] schedule unavailable: {}", e);
                AcquisitionState {
                    date_stamp,
                    downlink,
                    schedule: Schedule::Unavailable,
                    status: AcquisitionStatus::Unavailable,
                    error: Some(e.summary()),
                }
            }
        };
        true
    }

    /// Begin, fetch and complete in one go.
    pub async fn acquire(&mut self, now: &DateTime<Utc>) -> &AcquisitionState {
        let ticket = self.begin(now);
        let outcome = fetch(&self.source, &ticket, self.timeout).await;
        self.complete(&ticket, outcome);
        &self.state
    }

    /// Visible window at `now`. Empty while acquiring or unavailable.
    pub fn window(&self, now: &DateTime<Utc>) -> ScheduleWindow {
        ScheduleWindow::from_state(&self.state, &time_stamp(now), self.window_size)
    }
}

/// Parse fetched lines and decide the terminal status.
fn resolve(acquired: Acquired) -> Result<(Schedule, AcquisitionStatus), AcquireError> {
    let set = parser::parse(&acquired.lines);
    match (acquired.provenance, set.is_empty()) {
        (Provenance::Online, false) => Ok((Schedule::Entries(set), AcquisitionStatus::OnlineReady)),
        (Provenance::Offline, false) => {
            Ok((Schedule::Entries(set), AcquisitionStatus::OfflineReady))
        }
        (Provenance::Online, true) => Err(AcquireError::EmptyOnline),
        (_, _) => Err(AcquireError::StaleOffline),
    }
}
