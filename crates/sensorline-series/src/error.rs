use std::path::PathBuf;

/// Errors constructing a series.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    /// A series must hold at least one sample.
    #[error("series capacity must be at least 1")]
    ZeroCapacity,
}

/// Errors reported by a sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Writing the sink's output failed.
    #[error("failed writing {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred while rendering.
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The sink was used after it was closed.
    #[error("sink already closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, SeriesError>;
