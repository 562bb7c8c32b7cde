use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("sensorline {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: sensorline");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("SENSORLINE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("default_baud_rate: {}", sensorline_source::DEFAULT_BAUD_RATE);
    println!("default_capacity: {}", sensorline_series::DEFAULT_CAPACITY);
    println!("logger_time_step: {}", sensorline_monitor::LOGGER_TIME_STEP);

    Ok(SUCCESS)
}
