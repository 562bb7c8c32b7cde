use sensorline_monitor::{ClockMode, Monitor};
use sensorline_series::{CsvExportSink, DEFAULT_CAPACITY};

use crate::cmd::{install_ctrlc_handler, monitor_config, open_source, RecordArgs};
use crate::exit::{monitor_error, CliResult, SUCCESS};
use crate::output::{print_record_summary, ConsoleSink, Labels, OutputFormat};

pub fn run(args: RecordArgs, format: OutputFormat) -> CliResult<i32> {
    let clock = if args.wall_clock {
        ClockMode::Elapsed
    } else {
        ClockMode::Stepped {
            step: args.time_step,
        }
    };
    let config = monitor_config(&args.source, &args.poll, DEFAULT_CAPACITY, clock)?;
    let source = open_source(&args.source)?;
    let mut monitor =
        Monitor::new(source, config).map_err(|err| monitor_error("monitor setup failed", err))?;

    let stop = install_ctrlc_handler()?;
    let mut exporter = CsvExportSink::new(&args.output);
    tracing::info!(output = %args.output.display(), "recording; press Ctrl-C to stop and save");

    let summary = if args.quiet {
        monitor.run(&mut exporter, &stop)
    } else {
        // Echo goes to stderr so stdout carries only the summary.
        let mut echo = ConsoleSink::new(
            std::io::stderr(),
            OutputFormat::Raw,
            Labels {
                a: "temperature".to_string(),
                b: "humidity".to_string(),
            },
        );
        let mut both = (&mut exporter, &mut echo);
        monitor.run(&mut both, &stop)
    }
    .map_err(|err| monitor_error("record failed", err))?;

    let window = monitor.into_series().snapshot();
    print_record_summary(
        exporter.path(),
        exporter.records(),
        &window,
        &summary,
        format,
    );
    Ok(SUCCESS)
}
