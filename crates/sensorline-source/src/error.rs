/// Errors that can occur while opening or reading a byte source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Failed to open the serial port.
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        source: serialport::Error,
    },

    /// Failed to enumerate serial ports.
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(serialport::Error),

    /// An I/O error occurred while reading.
    #[error("source I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source reached end of stream.
    #[error("source closed")]
    Closed,
}

impl SourceError {
    /// The underlying I/O error kind, when one is known.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            SourceError::Io(err) => Some(err.kind()),
            SourceError::Open { source, .. }
            | SourceError::Enumerate(source) => match source.kind() {
                serialport::ErrorKind::Io(kind) => Some(kind),
                serialport::ErrorKind::NoDevice => Some(std::io::ErrorKind::NotFound),
                _ => None,
            },
            SourceError::Closed => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
