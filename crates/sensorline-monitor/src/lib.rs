//! The sensorline driving loop.
//!
//! A [`Monitor`] owns one byte source and pushes everything it produces
//! through framing, parsing and the bounded window, notifying a sink once
//! per accepted sample. It is single-threaded: the only blocking point is the
//! source's read timeout or the configured poll interval.

pub mod clock;
pub mod config;
pub mod error;
pub mod monitor;

pub use clock::{Clock, ClockMode, LOGGER_TIME_STEP};
pub use config::{MonitorConfig, DEFAULT_READ_CHUNK_SIZE};
pub use error::{MonitorError, Result};
pub use monitor::{Monitor, RunStats, RunSummary, StopReason, TickReport};
