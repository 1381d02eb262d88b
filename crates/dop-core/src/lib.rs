//! Daily operation plan (DOP) acquisition core for the xrit-rx dashboard.
//!
//! Everything here is presentation-free: the dashboard binary owns an
//! [`controller::AcquisitionController`] and renders the
//! [`window::ScheduleWindow`] it hands out.

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod parser;
pub mod platform;
pub mod rollover;
pub mod schedule;
pub mod source;
pub mod status;
pub mod window;
