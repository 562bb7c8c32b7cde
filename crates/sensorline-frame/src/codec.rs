use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Line terminator: a single `\n`.
pub const LINE_TERMINATOR: u8 = b'\n';

/// Record terminator expected immediately before the line terminator.
pub const RECORD_TERMINATOR: char = ';';

/// An unvalidated line extracted from the byte stream.
///
/// Holds the bytes between two line terminators, terminator excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    bytes: Bytes,
}

impl RawLine {
    /// Create a raw line from bytes (without the `\n`).
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// The line contents.
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the line is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lossy text rendering for diagnostics.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl From<&'static str> for RawLine {
    fn from(text: &'static str) -> Self {
        Self::new(Bytes::from_static(text.as_bytes()))
    }
}

impl std::fmt::Display for RawLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes))
    }
}

/// Split the next complete line off the front of `src`.
///
/// Returns `None` if `src` holds no terminator yet. On success, consumes the
/// line and its terminator from the buffer.
pub fn decode_line(src: &mut BytesMut) -> Option<RawLine> {
    let pos = src.iter().position(|&b| b == LINE_TERMINATOR)?;
    let line = src.split_to(pos).freeze();
    src.advance(1);
    Some(RawLine { bytes: line })
}

/// Encode a two-value record in the wire format.
///
/// Wire format:
/// ```text
/// <value_a> <value_b>;\n
/// ```
/// Both values are written with `precision` decimal places.
pub fn encode_record(value_a: f64, value_b: f64, precision: usize, dst: &mut BytesMut) {
    let text = format!("{value_a:.precision$} {value_b:.precision$}{RECORD_TERMINATOR}");
    dst.reserve(text.len() + 1);
    dst.put_slice(text.as_bytes());
    dst.put_u8(LINE_TERMINATOR);
}
