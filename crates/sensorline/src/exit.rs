use std::fmt;
use std::io;

use sensorline_monitor::MonitorError;
use sensorline_series::SinkError;
use sensorline_source::SourceError;

// Exit codes are part of the CLI contract; scripts match on them.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const SOURCE_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound => SOURCE_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn source_error(context: &str, err: SourceError) -> CliError {
    let code = match (&err, err.io_kind()) {
        (SourceError::Closed, _) => FAILURE,
        (_, Some(io::ErrorKind::PermissionDenied)) => PERMISSION_DENIED,
        (_, Some(io::ErrorKind::TimedOut)) => TIMEOUT,
        _ => SOURCE_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

// Output failures never report as source errors, whatever the io kind.
fn output_io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        _ => FAILURE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn sink_error(context: &str, err: SinkError) -> CliError {
    match err {
        SinkError::Write { source, path } => {
            output_io_error(&format!("{context}: {}", path.display()), source)
        }
        SinkError::Io(source) => output_io_error(context, source),
        SinkError::Closed => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

/// Whether a run ended because stdout's reader went away (e.g. `| head`).
pub fn is_broken_pipe(err: &MonitorError) -> bool {
    matches!(err, MonitorError::Sink(SinkError::Io(source)) if source.kind() == io::ErrorKind::BrokenPipe)
}

pub fn monitor_error(context: &str, err: MonitorError) -> CliError {
    match err {
        MonitorError::Sink(err) => sink_error(context, err),
        MonitorError::Series(_) | MonitorError::InvalidConfig(_) => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
    }
}
