use std::io::{IsTerminal, Write};
use std::path::Path;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use sensorline_monitor::RunSummary;
use sensorline_series::{ExportRecord, Sample, Sink, SinkError, Snapshot, ValueRange};
use sensorline_source::PortInfo;
use serde::Serialize;

/// Margin added around a channel's range to get its plot axis limits.
pub const AXIS_MARGIN: f64 = 2.0;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Display names of the two channels.
#[derive(Clone, Debug)]
pub struct Labels {
    pub a: String,
    pub b: String,
}

#[derive(Serialize)]
struct SampleOutput<'a> {
    timestamp: f64,
    label_a: &'a str,
    value_a: f64,
    label_b: &'a str,
    value_b: f64,
    window: usize,
    range_a: Option<ValueRange>,
    range_b: Option<ValueRange>,
    axis_a: Option<ValueRange>,
    axis_b: Option<ValueRange>,
}

/// Renders every snapshot to a writer (stdout by default) in the chosen format.
pub struct ConsoleSink<W> {
    out: W,
    format: OutputFormat,
    labels: Labels,
}

impl ConsoleSink<std::io::Stdout> {
    pub fn stdout(format: OutputFormat, labels: Labels) -> Self {
        Self::new(std::io::stdout(), format, labels)
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, format: OutputFormat, labels: Labels) -> Self {
        Self {
            out,
            format,
            labels,
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, snapshot: &Snapshot) -> std::io::Result<()> {
        // Ranges only exist once the window holds a sample.
        let Some(latest) = snapshot.latest() else {
            if matches!(self.format, OutputFormat::Pretty) {
                writeln!(self.out, "(no samples yet)")?;
            }
            return Ok(());
        };
        let range_a = snapshot.range_a();
        let range_b = snapshot.range_b();

        match self.format {
            OutputFormat::Json => {
                let out = SampleOutput {
                    timestamp: latest.timestamp(),
                    label_a: &self.labels.a,
                    value_a: latest.value_a(),
                    label_b: &self.labels.b,
                    value_b: latest.value_b(),
                    window: snapshot.len(),
                    range_a,
                    range_b,
                    axis_a: axis(range_a),
                    axis_b: axis(range_b),
                };
                writeln!(
                    self.out,
                    "{}",
                    serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
                )?;
            }
            OutputFormat::Table => {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec![
                        "TIME (s)".to_string(),
                        self.labels.a.to_uppercase(),
                        self.labels.b.to_uppercase(),
                        "WINDOW".to_string(),
                        format!("{} RANGE", self.labels.a.to_uppercase()),
                        format!("{} RANGE", self.labels.b.to_uppercase()),
                        format!("{} AXIS", self.labels.a.to_uppercase()),
                        format!("{} AXIS", self.labels.b.to_uppercase()),
                    ])
                    .add_row(vec![
                        format!("{:.2}", latest.timestamp()),
                        format!("{:.2}", latest.value_a()),
                        format!("{:.2}", latest.value_b()),
                        snapshot.len().to_string(),
                        range_text(range_a),
                        range_text(range_b),
                        range_text(axis(range_a)),
                        range_text(axis(range_b)),
                    ]);
                writeln!(self.out, "{table}")?;
            }
            OutputFormat::Pretty => {
                writeln!(
                    self.out,
                    "t={:>8.2}s  {}={:.2}  {}={:.2}  [n={} {} {} | {} {}]",
                    latest.timestamp(),
                    self.labels.a,
                    latest.value_a(),
                    self.labels.b,
                    latest.value_b(),
                    snapshot.len(),
                    self.labels.a,
                    range_text(range_a),
                    self.labels.b,
                    range_text(range_b),
                )?;
            }
            OutputFormat::Raw => {
                writeln!(self.out, "{} {}", latest.value_a(), latest.value_b())?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write> Sink for ConsoleSink<W> {
    fn accept(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        self.render(snapshot).map_err(SinkError::Io)
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.out.flush().map_err(SinkError::Io)
    }
}

fn axis(range: Option<ValueRange>) -> Option<ValueRange> {
    range.map(|r| r.padded(AXIS_MARGIN))
}

fn range_text(range: Option<ValueRange>) -> String {
    match range {
        Some(r) => format!("{:.2}..{:.2}", r.min, r.max),
        None => "-".to_string(),
    }
}

#[derive(Serialize)]
struct PortsOutput<'a> {
    ports: Vec<PortOutput<'a>>,
}

#[derive(Serialize)]
struct PortOutput<'a> {
    name: &'a str,
    kind: &'a str,
    description: Option<&'a str>,
}

pub fn print_ports(ports: &[PortInfo], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PortsOutput {
                ports: ports
                    .iter()
                    .map(|p| PortOutput {
                        name: &p.name,
                        kind: p.kind,
                        description: p.description.as_deref(),
                    })
                    .collect(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "TYPE", "DESCRIPTION"]);
            for p in ports {
                table.add_row(vec![
                    p.name.clone(),
                    p.kind.to_string(),
                    p.description.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            if ports.is_empty() {
                println!("no serial ports found");
            }
            for p in ports {
                match &p.description {
                    Some(d) => println!("{}  ({}, {d})", p.name, p.kind),
                    None => println!("{}  ({})", p.name, p.kind),
                }
            }
        }
        OutputFormat::Raw => {
            for p in ports {
                println!("{}", p.name);
            }
        }
    }
}

#[derive(Serialize)]
struct RecordSummaryOutput<'a> {
    output: String,
    rows: usize,
    written: bool,
    pressure_drop: Option<ValueRange>,
    window: usize,
    last_sample: Option<Sample>,
    #[serde(flatten)]
    run: &'a RunSummary,
}

pub fn print_record_summary(
    path: &Path,
    records: &[ExportRecord],
    window: &Snapshot,
    run: &RunSummary,
    format: OutputFormat,
) {
    let pressure_drop = records.iter().fold(None, |acc: Option<ValueRange>, r| {
        Some(match acc {
            None => ValueRange {
                min: r.pressure_drop,
                max: r.pressure_drop,
            },
            Some(range) => ValueRange {
                min: range.min.min(r.pressure_drop),
                max: range.max.max(r.pressure_drop),
            },
        })
    });
    let out = RecordSummaryOutput {
        output: path.display().to_string(),
        rows: records.len(),
        written: !records.is_empty(),
        pressure_drop,
        window: window.len(),
        last_sample: window.latest().copied(),
        run,
    };

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("Recording Summary:");
            if out.written {
                println!("  Output:         {}", out.output);
            } else {
                println!("  Output:         (nothing written)");
            }
            println!("  Rows:           {}", out.rows);
            println!("  Lines received: {}", run.stats.lines);
            println!("  Rejected:       {}", run.stats.rejected);
            println!("  Stopped by:     {:?}", run.reason);
            if let Some(last) = out.last_sample {
                println!(
                    "  Last sample:    t={:.2}s  {:.2}  {:.2}",
                    last.timestamp(),
                    last.value_a(),
                    last.value_b()
                );
            }
            match out.pressure_drop {
                Some(r) => println!("  Pressure drop:  {:.2}..{:.2} kPa", r.min, r.max),
                None => println!("  Pressure drop:  unavailable"),
            }
        }
        OutputFormat::Raw => {
            println!("{}", out.rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use sensorline_series::{BoundedSeries, Sample};

    use super::*;

    fn labels() -> Labels {
        Labels {
            a: "temperature".to_string(),
            b: "humidity".to_string(),
        }
    }

    fn render(format: OutputFormat, snapshot: &Snapshot) -> String {
        let mut sink = ConsoleSink::new(Vec::new(), format, labels());
        sink.accept(snapshot).unwrap();
        String::from_utf8(sink.into_inner()).unwrap()
    }

    fn two_samples() -> Snapshot {
        let mut series = BoundedSeries::default();
        series.append(Sample::new(0.5, 23.5, 55.2));
        series.append(Sample::new(1.0, 24.0, 54.0));
        series.snapshot()
    }

    #[test]
    fn empty_window_renders_without_ranges() {
        let snap = BoundedSeries::default().snapshot();
        assert_eq!(render(OutputFormat::Pretty, &snap), "(no samples yet)\n");
        assert_eq!(render(OutputFormat::Json, &snap), "");
        assert_eq!(render(OutputFormat::Table, &snap), "");
    }

    #[test]
    fn json_line_carries_window_ranges() {
        let text = render(OutputFormat::Json, &two_samples());
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["value_a"], 24.0);
        assert_eq!(value["window"], 2);
        assert_eq!(value["range_a"]["min"], 23.5);
        assert_eq!(value["range_b"]["max"], 55.2);
        assert_eq!(value["label_b"], "humidity");
    }

    #[test]
    fn pretty_line_format() {
        let text = render(OutputFormat::Pretty, &two_samples());
        assert_eq!(
            text,
            "t=    1.00s  temperature=24.00  humidity=54.00  [n=2 temperature 23.50..24.00 | humidity 54.00..55.20]\n"
        );
    }

    #[test]
    fn raw_echoes_values() {
        assert_eq!(render(OutputFormat::Raw, &two_samples()), "24 54\n");
    }

    #[test]
    fn table_has_headers() {
        let text = render(OutputFormat::Table, &two_samples());
        assert!(text.contains("TEMPERATURE RANGE"));
        assert!(text.contains("23.50..24.00"));
    }

    #[test]
    fn axis_limits_pad_the_range() {
        let table = render(OutputFormat::Table, &two_samples());
        assert!(table.contains("HUMIDITY AXIS"));
        assert!(table.contains("21.50..26.00"));
        assert!(table.contains("52.00..57.20"));

        let json = render(OutputFormat::Json, &two_samples());
        let value: serde_json::Value = serde_json::from_str(json.trim()).unwrap();
        assert_eq!(value["axis_a"]["min"], 21.5);
        assert_eq!(value["axis_a"]["max"], 26.0);
        assert_eq!(value["axis_b"]["min"], 52.0);
    }

    #[test]
    fn record_summary_serializes_last_sample() {
        let window = two_samples();
        let run = RunSummary {
            reason: sensorline_monitor::StopReason::EndOfStream,
            stats: sensorline_monitor::RunStats::default(),
        };
        let out = RecordSummaryOutput {
            output: "out.csv".to_string(),
            rows: 0,
            written: false,
            pressure_drop: None,
            window: window.len(),
            last_sample: window.latest().copied(),
            run: &run,
        };
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["window"], 2);
        assert_eq!(value["last_sample"]["timestamp"], 1.0);
        assert_eq!(value["last_sample"]["value_b"], 54.0);
        assert_eq!(value["reason"], "end_of_stream");
    }
}
