//! Run: read lines, parse them, print one JSON object per outcome.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::Arc;
use tracing::{info, warn};

use crate::conf::ParserConfig;
use crate::parser::metrics::{MetricsSnapshot, ParsingMetrics};
use crate::parser::{BuiltinFormat, FormatDefinition, FormatDetector, LineParser, ParseOutcome};

/// Parse `path` (or stdin when `None`) and write records to stdout.
pub fn run(config: &ParserConfig, path: Option<OsString>) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let out = io::BufWriter::new(stdout.lock());

    let snapshot = match path {
        Some(path) => {
            info!("Reading {}", path.to_string_lossy());
            let file = File::open(&path)?;
            drive(config, BufReader::new(file), out)?
        }
        None => {
            info!("Reading standard input");
            drive(config, io::stdin().lock(), out)?
        }
    };

    info!(
        "Finished: {} lines, {} matched, {} unmatched, {} too long, {} field anomalies ({:.1}% matched, {:.2}us/line)",
        snapshot.total_lines,
        snapshot.matched,
        snapshot.unmatched,
        snapshot.too_long,
        snapshot.field_anomalies,
        snapshot.match_rate * 100.0,
        snapshot.avg_parse_time_us,
    );
    Ok(())
}

/// Drive every line of `reader` through a parser and write the outcomes
/// to `out` as JSON lines.
pub fn drive<R: BufRead, W: Write>(
    config: &ParserConfig,
    mut reader: R,
    mut out: W,
) -> Result<MetricsSnapshot, Box<dyn std::error::Error>> {
    let metrics = Arc::new(ParsingMetrics::new());

    // Lines read while sampling are parsed before the rest of the input
    let mut pending = Vec::new();
    let format = match config.format.builtin() {
        Some(builtin) => Arc::new(builtin.definition()?),
        None => {
            while pending.len() < config.detection_sample_size {
                match next_line(&mut reader)? {
                    Some(line) => pending.push(line),
                    None => break,
                }
            }
            if pending.is_empty() {
                return Ok(metrics.snapshot());
            }
            detect(&pending, config.max_line_size)?
        }
    };

    let parser = LineParser::new(format)
        .with_max_line_size(config.max_line_size)
        .with_metrics(Arc::clone(&metrics));

    let mut line_number = 0;
    let mut pending = pending.into_iter();
    loop {
        let line = match pending.next() {
            Some(line) => line,
            None => match next_line(&mut reader)? {
                Some(line) => line,
                None => break,
            },
        };
        line_number += 1;

        let outcome = parser.parse_next(&line, line_number);
        emit(config, &outcome, &mut out)?;
    }

    out.flush()?;
    Ok(metrics.snapshot())
}

fn detect(
    samples: &[String],
    max_line_size: usize,
) -> Result<Arc<FormatDefinition>, Box<dyn std::error::Error>> {
    let candidates = BuiltinFormat::all_definitions()?
        .into_iter()
        .map(Arc::new)
        .collect();
    let detector = FormatDetector::new(candidates).with_max_line_size(max_line_size);

    let (format, result) = detector
        .detect_definition(samples)
        .ok_or_else(|| format!("Could not detect log format from the first {} lines", samples.len()))?;

    if result.is_high_confidence() {
        info!("Detected format {} (confidence {:.2})", format.name(), result.confidence);
    } else {
        warn!(
            "Detected format {} with low confidence {:.2}",
            format.name(),
            result.confidence
        );
    }
    Ok(format)
}

fn emit<W: Write>(config: &ParserConfig, outcome: &ParseOutcome, out: &mut W) -> io::Result<()> {
    match outcome {
        ParseOutcome::Request(request) => {
            if config.report_anomalies {
                for anomaly in &request.anomalies {
                    warn!(
                        line = request.line_number,
                        field = %anomaly.field,
                        token = %anomaly.token,
                        "Field conversion failed: {}", anomaly.error
                    );
                }
            }
        }
        ParseOutcome::Unmatched(_) if !config.emit_unmatched => return Ok(()),
        ParseOutcome::Unmatched(_) => {}
    }

    serde_json::to_writer(&mut *out, outcome)?;
    out.write_all(b"\n")
}

/// Read one line, without its terminator. Invalid UTF-8 is replaced
/// rather than rejected.
fn next_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    if buf.ends_with(b"\n") {
        buf.pop();
        if buf.ends_with(b"\r") {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}
