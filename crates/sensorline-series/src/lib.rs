//! Timestamped samples, the bounded live window, and the sinks that consume it.
//!
//! [`BoundedSeries`] keeps the most recent `N` samples in arrival order and
//! hands out owned [`Snapshot`]s; a [`Sink`] renders or exports them.

pub mod error;
pub mod export;
pub mod sample;
pub mod series;
pub mod sink;

pub use error::{Result, SeriesError, SinkError};
pub use export::{
    CsvExportSink, ExportRecord, PressureDropModel, SimulatedPressureDrop, ATMOSPHERIC_PRESSURE_HPA,
    CSV_HEADER,
};
pub use sample::Sample;
pub use series::{BoundedSeries, Snapshot, ValueRange, DEFAULT_CAPACITY};
pub use sink::{CollectingSink, Sink};
