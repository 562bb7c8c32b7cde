use sensorline_series::{SeriesError, SinkError};

/// Errors that end a monitor run.
///
/// Malformed input and transient source errors never surface here; they are
/// logged, counted and skipped.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// The configuration cannot be used.
    #[error("invalid monitor config: {0}")]
    InvalidConfig(&'static str),

    /// The series could not be created.
    #[error("series error: {0}")]
    Series(#[from] SeriesError),

    /// The sink rejected a snapshot or failed to close.
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
