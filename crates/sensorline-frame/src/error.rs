/// Errors surfaced while splitting a byte stream into lines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FramingError {
    /// A line grew past the configured limit.
    ///
    /// `size` is the number of bytes of the line seen when the limit tripped;
    /// for a line split across reads it can be less than the full length.
    #[error("line too long ({size} bytes, max {max}); discarded")]
    LineTooLong { size: usize, max: usize },
}

/// Reasons a framed line is not a valid record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The line is not valid UTF-8.
    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    /// The line does not end with the `;` record terminator.
    #[error("missing ';' record terminator")]
    MissingTerminator,

    /// The record does not contain exactly two fields.
    #[error("expected 2 fields, found {found}")]
    MalformedFields { found: usize },

    /// A field is not a finite decimal number.
    #[error("not a number: {token:?}")]
    NotANumber { token: String },
}
