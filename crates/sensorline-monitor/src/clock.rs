use std::time::Instant;

/// Fixed measurement interval of the inhalation logger, in seconds.
pub const LOGGER_TIME_STEP: f64 = 0.14;

/// How sample timestamps are produced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ClockMode {
    /// Seconds elapsed since the monitor was created.
    #[default]
    Elapsed,
    /// `0, step, 2*step, ...` per accepted sample, regardless of arrival time.
    Stepped { step: f64 },
}

/// Timestamp source for accepted samples.
#[derive(Debug, Clone)]
pub struct Clock {
    mode: ClockMode,
    start: Instant,
    stamped: u64,
}

impl Clock {
    /// Start a clock now.
    pub fn start(mode: ClockMode) -> Self {
        Self {
            mode,
            start: Instant::now(),
            stamped: 0,
        }
    }

    /// Timestamp for the next accepted sample.
    pub fn stamp(&mut self) -> f64 {
        let ts = match self.mode {
            ClockMode::Elapsed => self.start.elapsed().as_secs_f64(),
            ClockMode::Stepped { step } => self.stamped as f64 * step,
        };
        self.stamped = self.stamped.saturating_add(1);
        ts
    }
}
