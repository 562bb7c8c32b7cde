//! Live two-channel sensor telemetry from serial-connected microcontrollers.
//!
//! sensorline reads `<a> <b>;` text records from a serial port (or a replayed
//! capture), keeps a bounded live window, and hands snapshots to sinks.
//!
//! # Crate Structure
//!
//! - [`source`]: Byte sources (serial port, replayable readers)
//! - [`frame`]: Line framing and record parsing
//! - [`series`]: Samples, the bounded window, sinks and CSV export
//! - [`monitor`]: The driving poll loop

/// Re-export source types.
pub mod source {
    pub use sensorline_source::*;
}

/// Re-export frame types.
pub mod frame {
    pub use sensorline_frame::*;
}

/// Re-export series types.
pub mod series {
    pub use sensorline_series::*;
}

/// Re-export monitor types.
pub mod monitor {
    pub use sensorline_monitor::*;
}
