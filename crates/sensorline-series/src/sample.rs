use serde::Serialize;

/// One validated, timestamped two-value reading.
///
/// Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    timestamp: f64,
    value_a: f64,
    value_b: f64,
}

impl Sample {
    /// Create a sample. `timestamp` is seconds since the run started.
    pub fn new(timestamp: f64, value_a: f64, value_b: f64) -> Self {
        Self {
            timestamp,
            value_a,
            value_b,
        }
    }

    /// Seconds since the run started.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// First channel (temperature on the stock sketches).
    pub fn value_a(&self) -> f64 {
        self.value_a
    }

    /// Second channel (humidity on the stock sketches).
    pub fn value_b(&self) -> f64 {
        self.value_b
    }
}
