use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Args, Subcommand};
use sensorline_frame::FramerConfig;
use sensorline_monitor::{ClockMode, MonitorConfig, LOGGER_TIME_STEP};
use sensorline_series::DEFAULT_CAPACITY;
use sensorline_source::{ReaderSource, SampleSource, SerialConfig, SerialSource, DEFAULT_BAUD_RATE};

use crate::exit::{io_error, source_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod duration;
pub mod ports;
pub mod record;
pub mod simulate;
pub mod version;
pub mod watch;

use duration::{parse_delay, parse_duration};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a live window of incoming samples.
    Watch(WatchArgs),
    /// Log samples and export them as CSV on exit.
    Record(RecordArgs),
    /// List serial ports.
    Ports(PortsArgs),
    /// Write synthetic protocol lines to stdout.
    Simulate(SimulateArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Watch(args) => watch::run(args, format),
        Command::Record(args) => record::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Simulate(args) => simulate::run(args),
        Command::Version(args) => version::run(args),
    }
}

/// Where samples come from.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Serial device to read (e.g. /dev/ttyACM0, COM5).
    #[arg(long, short = 'p', env = "SENSORLINE_PORT")]
    pub port: Option<String>,
    /// Replay a capture file instead of a serial port ("-" reads stdin).
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,
    /// Serial baud rate.
    #[arg(long, short = 'b', env = "SENSORLINE_BAUD", default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// Serial read timeout (e.g. 1s, 500ms).
    #[arg(long, default_value = "1s")]
    pub read_timeout: String,
    /// Wait after opening the port for the board to reset (e.g. 2s, 0).
    #[arg(long, default_value = "2s")]
    pub settle: String,
    /// Drop lines longer than this many bytes. Unlimited by default.
    #[arg(long, value_name = "BYTES")]
    pub max_line: Option<usize>,
}

/// Poll loop settings shared by `watch` and `record`.
#[derive(Args, Debug)]
pub struct LoopArgs {
    /// Sleep between polls (e.g. 100ms). Polls continuously when omitted.
    #[arg(long)]
    pub interval: Option<String>,
    /// Exit after N accepted samples.
    #[arg(long)]
    pub count: Option<u64>,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub poll: LoopArgs,
    /// Number of samples kept in the live window.
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,
    /// Name of the first value.
    #[arg(long, default_value = "temperature")]
    pub label_a: String,
    /// Name of the second value.
    #[arg(long, default_value = "humidity")]
    pub label_b: String,
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub poll: LoopArgs,
    /// CSV file written when recording stops.
    #[arg(long, short = 'o', default_value = "inhaler_data_log.csv")]
    pub output: PathBuf,
    /// Measurement time added per accepted sample, in seconds.
    #[arg(long, default_value_t = LOGGER_TIME_STEP, conflicts_with = "wall_clock")]
    pub time_step: f64,
    /// Stamp samples with elapsed wall time instead of a fixed step.
    #[arg(long)]
    pub wall_clock: bool,
    /// Do not echo samples while recording.
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of records to emit. Runs until interrupted when omitted.
    #[arg(long)]
    pub count: Option<u64>,
    /// Delay between records (e.g. 500ms).
    #[arg(long)]
    pub interval: Option<String>,
    /// Baseline of the first value.
    #[arg(long, default_value_t = 23.5, allow_negative_numbers = true)]
    pub base_a: f64,
    /// Baseline of the second value.
    #[arg(long, default_value_t = 55.2, allow_negative_numbers = true)]
    pub base_b: f64,
    /// Emit a malformed line after every N records.
    #[arg(long, value_name = "N")]
    pub garbage_every: Option<u64>,
    /// Decimal places written per value.
    #[arg(long, default_value_t = 2)]
    pub precision: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Open the byte source selected on the command line. Failures here are fatal.
pub fn open_source(args: &SourceArgs) -> CliResult<Box<dyn SampleSource>> {
    if let Some(path) = &args.replay {
        if path.as_os_str() == "-" {
            return Ok(Box::new(ReaderSource::new(std::io::stdin(), "stdin")));
        }
        let file = std::fs::File::open(path)
            .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
        return Ok(Box::new(ReaderSource::new(file, path.display().to_string())));
    }

    let Some(port) = &args.port else {
        return Err(CliError::new(
            USAGE,
            "no source: pass --port (or set SENSORLINE_PORT) or --replay",
        ));
    };

    let config = SerialConfig {
        baud_rate: args.baud,
        read_timeout: parse_duration(&args.read_timeout)?,
        settle_delay: parse_delay(&args.settle)?,
        ..SerialConfig::new(port.as_str())
    };
    let source = SerialSource::open(&config).map_err(|err| source_error("open failed", err))?;
    tracing::info!(port = %source.path(), baud_rate = source.baud_rate(), "connected");
    Ok(Box::new(source))
}

/// Monitor settings from the shared flags.
pub fn monitor_config(
    source: &SourceArgs,
    poll: &LoopArgs,
    capacity: usize,
    clock: ClockMode,
) -> CliResult<MonitorConfig> {
    let poll_interval = poll.interval.as_deref().map(parse_duration).transpose()?;
    Ok(MonitorConfig {
        capacity,
        poll_interval,
        max_samples: poll.count,
        framer: FramerConfig {
            max_line_length: source.max_line,
        },
        clock,
        ..MonitorConfig::default()
    })
}

/// Flag raised by Ctrl-C.
pub fn install_ctrlc_handler() -> CliResult<Arc<AtomicBool>> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })?;
    Ok(stop)
}
