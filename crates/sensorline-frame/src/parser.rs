use crate::codec::{RawLine, RECORD_TERMINATOR};
use crate::error::ParseError;

/// Number of numeric fields in a record.
const FIELD_COUNT: usize = 2;

/// A validated two-value record, not yet timestamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub value_a: f64,
    pub value_b: f64,
}

/// Validates framed lines against the record grammar.
///
/// Grammar, after trimming surrounding whitespace:
/// ```text
/// record = number ws+ number ";"
/// ```
/// The `;` is mandatory. Numbers must parse as finite `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordParser;

impl RecordParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse one framed line. Never panics on malformed input.
    pub fn parse(&self, line: &RawLine) -> Result<Reading, ParseError> {
        let text = std::str::from_utf8(line.as_bytes()).map_err(|_| ParseError::InvalidUtf8)?;
        self.parse_str(text)
    }

    /// Parse a record from text.
    pub fn parse_str(&self, text: &str) -> Result<Reading, ParseError> {
        let body = text
            .trim()
            .strip_suffix(RECORD_TERMINATOR)
            .ok_or(ParseError::MissingTerminator)?;

        let fields: Vec<&str> = body.split_ascii_whitespace().collect();
        if fields.len() != FIELD_COUNT {
            return Err(ParseError::MalformedFields {
                found: fields.len(),
            });
        }

        Ok(Reading {
            value_a: parse_number(fields[0])?,
            value_b: parse_number(fields[1])?,
        })
    }
}

fn parse_number(token: &str) -> Result<f64, ParseError> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ParseError::NotANumber {
            token: token.to_string(),
        }),
    }
}
