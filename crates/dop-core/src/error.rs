//! Error types for schedule acquisition.
//!
//! None of these are fatal to the dashboard: the controller collapses every
//! one of them into an `Unavailable` schedule with explanatory text.

use std::time::Duration;
use thiserror::Error;

/// Transport or non-success response while talking to a remote endpoint.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The body could not be read or decoded into the expected shape.
    #[error("unexpected response body from {url}: {reason}")]
    Body { url: String, reason: String },

    /// A cached copy configured as a local path could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Primary and fallback both failed.
    #[error("primary source failed ({primary}); fallback failed ({fallback})")]
    Exhausted {
        primary: Box<FetchError>,
        fallback: Box<FetchError>,
    },
}

/// Structural problems in a DOP document. Always collapsed to an empty set
/// by [`crate::parser::parse`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("marker {0:?} not found")]
    MissingMarker(&'static str),

    #[error("data range is empty (start line {start}, end line {end})")]
    EmptyRange { start: usize, end: isize },

    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },
}

/// Why an acquisition attempt ended in `Unavailable`.
#[derive(Error, Debug)]
pub enum AcquireError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Fallback transport succeeded but yielded zero usable entries.
    #[error("cached schedule is stale: no usable entries")]
    StaleOffline,

    /// Primary source answered but the plan has no usable entries.
    #[error("schedule source reports no usable entries")]
    EmptyOnline,

    #[error("schedule acquisition timed out after {0:?}")]
    Timeout(Duration),
}

impl FetchError {
    /// Short one-line reason for status displays.
    pub fn summary(&self) -> String {
        match self {
            FetchError::Transport { url, .. } => format!("{} unreachable", url),
            FetchError::Status { status, .. } => format!("HTTP {}", status.as_u16()),
            FetchError::Body { reason, .. } => reason.clone(),
            FetchError::Io { path, .. } => format!("{} unreadable", path),
            FetchError::Exhausted { primary, fallback } => {
                format!("primary: {}; fallback: {}", primary.summary(), fallback.summary())
            }
        }
    }
}

impl AcquireError {
    /// Explanatory text shown next to an unavailable schedule.
    pub fn summary(&self) -> String {
        match self {
            AcquireError::Fetch(e) => e.summary(),
            other => other.to_string(),
        }
    }
}
