use sensorline_monitor::{ClockMode, Monitor};

use crate::cmd::{install_ctrlc_handler, monitor_config, open_source, WatchArgs};
use crate::exit::{is_broken_pipe, monitor_error, CliResult, SUCCESS};
use crate::output::{ConsoleSink, Labels, OutputFormat};

pub fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let config = monitor_config(&args.source, &args.poll, args.capacity, ClockMode::Elapsed)?;
    let source = open_source(&args.source)?;
    let mut monitor =
        Monitor::new(source, config).map_err(|err| monitor_error("monitor setup failed", err))?;

    let stop = install_ctrlc_handler()?;
    let mut sink = ConsoleSink::stdout(
        format,
        Labels {
            a: args.label_a,
            b: args.label_b,
        },
    );

    match monitor.run(&mut sink, &stop) {
        Ok(summary) => {
            tracing::debug!(reason = ?summary.reason, lines = summary.stats.lines, "watch finished");
            Ok(SUCCESS)
        }
        Err(err) if is_broken_pipe(&err) => Ok(SUCCESS),
        Err(err) => Err(monitor_error("watch failed", err)),
    }
}
