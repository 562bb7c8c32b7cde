use std::io::{self, Write};
use std::sync::atomic::Ordering;

use bytes::BytesMut;
use sensorline_frame::encode_record;

use crate::cmd::duration::parse_duration;
use crate::cmd::{install_ctrlc_handler, SimulateArgs};
use crate::exit::{io_error, CliResult, SUCCESS};

const GARBAGE_LINE: &[u8] = b"sensor warming up\n";

/// Deterministic test signal: a slow sine on the first value, cosine on the second.
fn reading(index: u64, base_a: f64, base_b: f64) -> (f64, f64) {
    let t = index as f64;
    (
        base_a + 1.5 * (t * 0.2).sin(),
        base_b + 3.0 * (t * 0.15).cos(),
    )
}

/// Append record `index` (and a malformed line when due) to `dst`.
fn emit(index: u64, args: &SimulateArgs, dst: &mut BytesMut) {
    let (a, b) = reading(index, args.base_a, args.base_b);
    encode_record(a, b, args.precision, dst);
    if let Some(every) = args.garbage_every.filter(|n| *n > 0) {
        if (index + 1) % every == 0 {
            dst.extend_from_slice(GARBAGE_LINE);
        }
    }
}

pub fn run(args: SimulateArgs) -> CliResult<i32> {
    let interval = args.interval.as_deref().map(parse_duration).transpose()?;
    let stop = install_ctrlc_handler()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut buf = BytesMut::with_capacity(64);
    let mut index = 0u64;

    while !stop.load(Ordering::SeqCst) {
        if args.count.is_some_and(|count| index >= count) {
            break;
        }
        buf.clear();
        emit(index, &args, &mut buf);

        let written = out.write_all(&buf).and_then(|()| out.flush());
        match written {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => break,
            Err(err) => return Err(io_error("write failed", err)),
        }
        index = index.saturating_add(1);

        if let Some(interval) = interval {
            std::thread::sleep(interval);
        }
    }

    tracing::debug!(records = index, "simulation finished");
    Ok(SUCCESS)
}
