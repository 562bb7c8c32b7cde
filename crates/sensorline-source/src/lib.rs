//! Byte sources feeding the sensorline pipeline.
//!
//! A [`SampleSource`] hands over whatever bytes are available on each poll:
//! - [`SerialSource`] reads from a serial-connected microcontroller
//! - [`ReaderSource`] replays any `Read` (capture files, stdin, test buffers)
//!
//! This is the lowest layer of sensorline. Line framing and parsing build on
//! top of the raw chunks produced here.

pub mod error;
pub mod reader;
pub mod serial;
pub mod traits;

pub use error::{Result, SourceError};
pub use reader::ReaderSource;
pub use serial::{list_ports, PortInfo, SerialConfig, SerialSource, DEFAULT_BAUD_RATE};
pub use traits::SampleSource;
