//! CSV export of accepted samples for the inhalation logger.
//!
//! Every accepted sample becomes one [`ExportRecord`]; the file is written in
//! one go when the sink is closed.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};
use serde::Serialize;

use crate::error::SinkError;
use crate::sample::Sample;
use crate::series::Snapshot;
use crate::sink::Sink;

/// Atmospheric pressure written to every record. No sensor reports it yet.
pub const ATMOSPHERIC_PRESSURE_HPA: f64 = 950.0;

/// Header row of the exported CSV.
pub const CSV_HEADER: &str = "Year,Month,Day,Hour,Minute,Second,Temperature (C),Humidity (%),\
Atmospheric Pressure (hPa),Measurement Time (s),Pressure Drop (kPa)";

/// Derives the pressure drop column from the measurement time.
pub trait PressureDropModel {
    fn pressure_drop(&self, measurement_time: f64) -> f64;
}

/// Placeholder `1 / (t + 1)`, rounded to two decimals.
///
/// Not a physical model; stands in until the board reports a real signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedPressureDrop;

impl PressureDropModel for SimulatedPressureDrop {
    fn pressure_drop(&self, measurement_time: f64) -> f64 {
        round2(1.0 / (measurement_time + 1.0))
    }
}

/// One exported CSV row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub temperature: f64,
    pub humidity: f64,
    pub atmospheric_pressure: f64,
    pub measurement_time: f64,
    pub pressure_drop: f64,
}

impl ExportRecord {
    /// Build a record for `sample` received at wall-clock time `wall`.
    pub fn from_sample<Tz: TimeZone>(
        sample: &Sample,
        wall: &DateTime<Tz>,
        model: &dyn PressureDropModel,
    ) -> Self {
        Self {
            year: wall.year(),
            month: wall.month(),
            day: wall.day(),
            hour: wall.hour(),
            minute: wall.minute(),
            second: wall.second(),
            temperature: sample.value_a(),
            humidity: sample.value_b(),
            atmospheric_pressure: ATMOSPHERIC_PRESSURE_HPA,
            measurement_time: round2(sample.timestamp()),
            pressure_drop: model.pressure_drop(sample.timestamp()),
        }
    }

    /// The record as a CSV row (no trailing newline).
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{}",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            csv_float(self.temperature),
            csv_float(self.humidity),
            csv_float(self.atmospheric_pressure),
            csv_float(self.measurement_time),
            csv_float(self.pressure_drop),
        )
    }
}

/// Accumulates an [`ExportRecord`] per accepted sample and writes them as CSV
/// on close.
pub struct CsvExportSink {
    path: PathBuf,
    records: Vec<ExportRecord>,
    model: Box<dyn PressureDropModel>,
    closed: bool,
}

impl CsvExportSink {
    /// Export to `path` using the simulated pressure-drop placeholder.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_model(path, Box::new(SimulatedPressureDrop))
    }

    /// Export to `path` with a custom pressure-drop model.
    pub fn with_model(path: impl Into<PathBuf>, model: Box<dyn PressureDropModel>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
            model,
            closed: false,
        }
    }

    /// Records accumulated so far.
    pub fn records(&self) -> &[ExportRecord] {
        &self.records
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record `sample` as received at `wall`.
    pub fn record_at<Tz: TimeZone>(&mut self, sample: &Sample, wall: &DateTime<Tz>) {
        let record = ExportRecord::from_sample(sample, wall, self.model.as_ref());
        self.records.push(record);
    }

    /// Write the header and all records to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "{CSV_HEADER}")?;
        for record in &self.records {
            writeln!(writer, "{}", record.to_csv_row())?;
        }
        writer.flush()
    }

    fn write_file(&self) -> Result<(), SinkError> {
        let to_write_error = |source| SinkError::Write {
            path: self.path.clone(),
            source,
        };
        let file = File::create(&self.path).map_err(to_write_error)?;
        self.write_to(BufWriter::new(file)).map_err(to_write_error)
    }
}

impl Sink for CsvExportSink {
    fn accept(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed);
        }
        if let Some(sample) = snapshot.latest() {
            self.record_at(sample, &Local::now());
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        if self.records.is_empty() {
            tracing::info!(path = %self.path.display(), "no samples collected; nothing exported");
            return Ok(());
        }

        self.write_file()?;
        tracing::info!(
            path = %self.path.display(),
            rows = self.records.len(),
            "data saved"
        );
        Ok(())
    }
}

impl std::fmt::Debug for CsvExportSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvExportSink")
            .field("path", &self.path)
            .field("records", &self.records.len())
            .field("closed", &self.closed)
            .finish()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// Shortest round-trip form, always with a fractional part ("950.0", "0.88").
fn csv_float(value: f64) -> String {
    format!("{value:?}")
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use super::*;

    fn wall() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 9)
            .unwrap()
            .and_utc()
    }

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "sensorline-export-{tag}-{}-{}.csv",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
    }

    #[test]
    fn simulated_pressure_drop_values() {
        let model = SimulatedPressureDrop;
        assert_eq!(model.pressure_drop(0.0), 1.0);
        assert_eq!(model.pressure_drop(0.14), 0.88);
        assert_eq!(model.pressure_drop(1.0), 0.5);
    }

    #[test]
    fn record_from_sample() {
        let sample = Sample::new(0.28, 23.5, 55.2);
        let record = ExportRecord::from_sample(&sample, &wall(), &SimulatedPressureDrop);

        assert_eq!(
            (record.year, record.month, record.day),
            (2024, 3, 5)
        );
        assert_eq!((record.hour, record.minute, record.second), (14, 7, 9));
        assert_eq!(record.temperature, 23.5);
        assert_eq!(record.humidity, 55.2);
        assert_eq!(record.atmospheric_pressure, ATMOSPHERIC_PRESSURE_HPA);
        assert_eq!(record.measurement_time, 0.28);
        assert_eq!(record.pressure_drop, 0.78);
    }

    #[test]
    fn csv_row_format() {
        let sample = Sample::new(0.0, 23.5, 55.0);
        let record = ExportRecord::from_sample(&sample, &wall(), &SimulatedPressureDrop);
        assert_eq!(
            record.to_csv_row(),
            "2024,3,5,14,7,9,23.5,55.0,950.0,0.0,1.0"
        );
    }

    #[test]
    fn custom_model_is_used() {
        struct Constant;
        impl PressureDropModel for Constant {
            fn pressure_drop(&self, _measurement_time: f64) -> f64 {
                1.25
            }
        }

        let mut sink = CsvExportSink::with_model(temp_path("model"), Box::new(Constant));
        sink.record_at(&Sample::new(3.0, 1.0, 2.0), &wall());
        assert_eq!(sink.records()[0].pressure_drop, 1.25);
    }

    #[test]
    fn write_to_emits_header_and_rows() {
        let mut sink = CsvExportSink::new(temp_path("write-to"));
        sink.record_at(&Sample::new(0.0, 23.5, 55.2), &wall());
        sink.record_at(&Sample::new(0.14, 23.6, 55.1), &wall());

        let mut out = Vec::new();
        sink.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[2], "2024,3,5,14,7,9,23.6,55.1,950.0,0.14,0.88");
    }

    #[test]
    fn close_writes_file_once() {
        let path = temp_path("close");
        let mut sink = CsvExportSink::new(&path);

        let mut series = crate::series::BoundedSeries::default();
        series.append(Sample::new(0.0, 23.5, 55.2));
        sink.accept(&series.snapshot()).unwrap();
        sink.close().unwrap();
        sink.close().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().ends_with(",23.5,55.2,950.0,0.0,1.0"));
        assert!(matches!(
            sink.accept(&series.snapshot()),
            Err(SinkError::Closed)
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn close_without_records_writes_nothing() {
        let path = temp_path("empty");
        let mut sink = CsvExportSink::new(&path);
        sink.accept(&Snapshot::default()).unwrap();
        sink.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_path_reports_write_error() {
        let path = temp_path("missing-dir").join("nested").join("out.csv");
        let mut sink = CsvExportSink::new(&path);
        sink.record_at(&Sample::new(0.0, 1.0, 2.0), &wall());
        let err = sink.close().unwrap_err();
        assert!(matches!(err, SinkError::Write { .. }));
    }

    #[test]
    fn record_serializes_to_json() {
        let record =
            ExportRecord::from_sample(&Sample::new(0.0, 1.0, 2.0), &wall(), &SimulatedPressureDrop);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["pressure_drop"], 1.0);
        assert_eq!(json["year"], 2024);
    }
}
