//! Line framing and record parsing for serial sensor streams.
//!
//! The wire format is ASCII text, one record per line:
//! - two decimal numbers separated by whitespace
//! - a mandatory `;` record terminator
//! - a `\n` line terminator
//!
//! [`LineFramer`] turns arbitrary byte chunks into [`RawLine`]s;
//! [`RecordParser`] validates them into [`Reading`]s.

pub mod codec;
pub mod error;
pub mod framer;
pub mod parser;

pub use codec::{decode_line, encode_record, RawLine, LINE_TERMINATOR, RECORD_TERMINATOR};
pub use error::{FramingError, ParseError};
pub use framer::{FramerConfig, LineFramer, Lines};
pub use parser::{Reading, RecordParser};
