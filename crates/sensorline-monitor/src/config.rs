use std::time::Duration;

use sensorline_frame::FramerConfig;
use sensorline_series::DEFAULT_CAPACITY;

use crate::clock::ClockMode;

/// Bytes requested from the source per poll.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 1024;

/// Controls a monitor run.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Live window capacity. Default: 100.
    pub capacity: usize,
    /// Sleep between polls. `None` polls in a tight loop and relies on the
    /// source read timeout to pace it.
    pub poll_interval: Option<Duration>,
    /// Stop after this many accepted samples.
    pub max_samples: Option<u64>,
    /// Bytes requested from the source per poll. Default: 1 KiB.
    pub read_chunk_size: usize,
    /// Line framer settings.
    pub framer: FramerConfig,
    /// Timestamp source.
    pub clock: ClockMode,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            poll_interval: None,
            max_samples: None,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            framer: FramerConfig::default(),
            clock: ClockMode::Elapsed,
        }
    }
}
