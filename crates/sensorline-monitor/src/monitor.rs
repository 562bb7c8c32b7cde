use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use sensorline_frame::{LineFramer, RecordParser};
use sensorline_series::{BoundedSeries, Sample, Sink};
use sensorline_source::{SampleSource, SourceError};

use crate::clock::{Clock, ClockMode};
use crate::config::MonitorConfig;
use crate::error::{MonitorError, Result};

/// Counters accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub bytes_read: u64,
    pub lines: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub framing_errors: u64,
    pub source_errors: u64,
}

/// What a single poll did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub bytes_read: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// The source reported end of stream.
    pub end_of_stream: bool,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The stop flag was raised (Ctrl-C).
    Stopped,
    /// The source has no more bytes.
    EndOfStream,
    /// The configured sample limit was reached.
    SampleLimit,
}

/// Outcome of [`Monitor::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub reason: StopReason,
    pub stats: RunStats,
}

/// Drives source → framer → parser → series → sink.
pub struct Monitor<S> {
    source: S,
    framer: LineFramer,
    parser: RecordParser,
    series: BoundedSeries,
    clock: Clock,
    config: MonitorConfig,
    stats: RunStats,
    chunk: Vec<u8>,
}

impl<S: SampleSource> Monitor<S> {
    /// Build a monitor over `source`. The timestamp clock starts now.
    pub fn new(source: S, config: MonitorConfig) -> Result<Self> {
        if config.read_chunk_size == 0 {
            return Err(MonitorError::InvalidConfig(
                "read_chunk_size must be greater than zero",
            ));
        }
        if let ClockMode::Stepped { step } = config.clock {
            if !(step.is_finite() && step > 0.0) {
                return Err(MonitorError::InvalidConfig(
                    "clock step must be a positive number of seconds",
                ));
            }
        }
        let series = BoundedSeries::new(config.capacity)?;
        Ok(Self {
            source,
            framer: LineFramer::with_config(config.framer.clone()),
            parser: RecordParser::new(),
            series,
            clock: Clock::start(config.clock),
            chunk: vec![0u8; config.read_chunk_size],
            config,
            stats: RunStats::default(),
        })
    }

    /// Poll the source once and push whatever arrived through the pipeline.
    ///
    /// Transient source errors count as "no data this tick".
    pub fn poll_once<K: Sink + ?Sized>(&mut self, sink: &mut K) -> Result<TickReport> {
        let read = match self.source.poll(&mut self.chunk) {
            Ok(n) => n,
            Err(SourceError::Closed) => {
                return Ok(TickReport {
                    end_of_stream: true,
                    ..TickReport::default()
                });
            }
            Err(err) => {
                self.stats.source_errors = self.stats.source_errors.saturating_add(1);
                tracing::debug!(source = %self.source.describe(), error = %err, "read failed; no data this tick");
                return Ok(TickReport::default());
            }
        };

        let chunk = std::mem::take(&mut self.chunk);
        let result = self.ingest(&chunk[..read], sink);
        self.chunk = chunk;

        let mut report = result?;
        report.bytes_read = read;
        Ok(report)
    }

    /// Push `bytes` through framing and parsing, appending every valid record.
    ///
    /// Stops early (leaving later lines buffered) once the sample limit is hit.
    pub fn ingest<K: Sink + ?Sized>(&mut self, bytes: &[u8], sink: &mut K) -> Result<TickReport> {
        let mut report = TickReport::default();
        self.stats.bytes_read = self.stats.bytes_read.saturating_add(bytes.len() as u64);

        let mut lines = self.framer.feed(bytes);
        while !limit_reached(&self.config, &self.stats) {
            let Some(next) = lines.next() else {
                break;
            };

            let line = match next {
                Ok(line) => line,
                Err(err) => {
                    self.stats.framing_errors = self.stats.framing_errors.saturating_add(1);
                    tracing::warn!(error = %err, "dropping unframed data");
                    continue;
                }
            };
            self.stats.lines = self.stats.lines.saturating_add(1);

            match self.parser.parse(&line) {
                Ok(reading) => {
                    let sample = Sample::new(self.clock.stamp(), reading.value_a, reading.value_b);
                    tracing::debug!(
                        timestamp = sample.timestamp(),
                        value_a = sample.value_a(),
                        value_b = sample.value_b(),
                        "sample accepted"
                    );
                    self.series.append(sample);
                    self.stats.accepted = self.stats.accepted.saturating_add(1);
                    report.accepted += 1;
                    sink.accept(&self.series.snapshot())?;
                }
                Err(err) => {
                    self.stats.rejected = self.stats.rejected.saturating_add(1);
                    report.rejected += 1;
                    tracing::warn!(line = %line, error = %err, "invalid data received");
                }
            }
        }

        Ok(report)
    }

    /// Poll until stopped, the source ends, or the sample limit is reached,
    /// then close the sink.
    pub fn run<K: Sink + ?Sized>(&mut self, sink: &mut K, stop: &AtomicBool) -> Result<RunSummary> {
        tracing::info!(source = %self.source.describe(), capacity = self.series.capacity(), "monitor started");

        let outcome = self.run_loop(sink, stop);
        let closed = sink.close();

        let reason = outcome?;
        closed?;

        if let Some(tail) = self.framer.take_remainder() {
            tracing::debug!(bytes = tail.len(), "discarding unterminated trailing data");
        }

        tracing::info!(
            reason = ?reason,
            accepted = self.stats.accepted,
            rejected = self.stats.rejected,
            "monitor stopped"
        );
        Ok(RunSummary {
            reason,
            stats: self.stats,
        })
    }

    fn run_loop<K: Sink + ?Sized>(&mut self, sink: &mut K, stop: &AtomicBool) -> Result<StopReason> {
        loop {
            if stop.load(Ordering::SeqCst) {
                return Ok(StopReason::Stopped);
            }
            if limit_reached(&self.config, &self.stats) {
                return Ok(StopReason::SampleLimit);
            }

            let report = self.poll_once(sink)?;
            if report.end_of_stream {
                return Ok(StopReason::EndOfStream);
            }
            if limit_reached(&self.config, &self.stats) {
                return Ok(StopReason::SampleLimit);
            }

            if let Some(interval) = self.config.poll_interval {
                std::thread::sleep(interval);
            }
        }
    }

    /// The live window.
    pub fn series(&self) -> &BoundedSeries {
        &self.series
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Consume the monitor, closing the source and returning the window.
    pub fn into_series(self) -> BoundedSeries {
        self.series
    }
}

fn limit_reached(config: &MonitorConfig, stats: &RunStats) -> bool {
    config
        .max_samples
        .is_some_and(|max| stats.accepted >= max)
}
