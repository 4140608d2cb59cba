mod csv;
mod json;
mod text;

use std::io::Write;

use rolling_stats::Stats;
use serde::Serialize;

use crate::constants::{OUTPUT_COLUMN, TIME_COLUMN, VOLTAGE_COLUMN};
use crate::data::Signal;
use crate::error::{LpfError, Result};
use crate::filter::FilterParams;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Summary statistics of one trace
#[derive(Debug, Clone, Serialize)]
pub struct TraceStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Last sample, i.e. where the trace has settled to
    #[serde(rename = "final")]
    pub final_value: f64,
}

impl TraceStats {
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let final_value = *samples.last()?;
        let mut stats: Stats<f64> = Stats::new();
        for &s in samples {
            stats.update(s);
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
            final_value,
        })
    }
}

/// Everything printed about one filter run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub source: String,
    pub samples: usize,
    pub duration_secs: f64,
    pub cutoff_rad_s: f64,
    pub cutoff_hz: f64,
    pub rf: f64,
    pub ri: f64,
    pub input: Option<TraceStats>,
    pub output: Option<TraceStats>,
}

impl RunSummary {
    pub fn new(source: String, signal: &Signal, params: &FilterParams, vout: &[f64]) -> Self {
        Self {
            source,
            samples: signal.len(),
            duration_secs: signal.duration(),
            cutoff_rad_s: params.cutoff,
            cutoff_hz: params.cutoff / (2.0 * std::f64::consts::PI),
            rf: params.rf,
            ri: params.ri,
            input: TraceStats::from_samples(&signal.voltage),
            output: TraceStats::from_samples(vout),
        }
    }
}

pub trait Formatter {
    fn format(&self, summary: &RunSummary) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

/// Write `Time (s), Channel 1 (V), Output (V)` rows for a filtered signal.
pub fn write_trace<W: Write>(writer: W, signal: &Signal, vout: &[f64]) -> Result<()> {
    if vout.len() != signal.len() {
        return Err(LpfError::LengthMismatch {
            inputs: vout.len(),
            times: signal.len(),
        });
    }

    let mut wtr = ::csv::Writer::from_writer(writer);
    wtr.write_record([TIME_COLUMN, VOLTAGE_COLUMN, OUTPUT_COLUMN])?;
    for ((t, vin), out) in signal.time.iter().zip(&signal.voltage).zip(vout) {
        wtr.write_record(&[t.to_string(), vin.to_string(), out.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CircuitConfig;

    fn summary() -> RunSummary {
        let signal = Signal::new(vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]).unwrap();
        let params = FilterParams::new(10.0, &CircuitConfig::default());
        RunSummary::new("test.csv".to_string(), &signal, &params, &[0.0, 1.5, 2.5])
    }

    #[test]
    fn test_trace_stats() {
        let stats = TraceStats::from_samples(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(stats.count, 3);
        assert!((stats.mean - 2.0).abs() < 1e-12);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.final_value, 3.0);
        assert!(TraceStats::from_samples(&[]).is_none());
    }

    #[test]
    fn test_json_is_valid() {
        let line = JsonFormatter.format(&summary());
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["samples"], 3);
        assert_eq!(value["output"]["final"], 2.5);
    }

    #[test]
    fn test_csv_matches_header_width() {
        let f = CsvFormatter;
        let header_fields = f.header().unwrap().split(',').count();
        let row_fields = f.format(&summary()).split(',').count();
        assert_eq!(header_fields, row_fields);
    }

    #[test]
    fn test_csv_quotes_source_with_comma() {
        let mut s = summary();
        s.source = "runs/a,b.csv".to_string();
        let row = CsvFormatter.format(&s);

        let mut rdr = ::csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(row.as_bytes());
        let record = rdr.records().next().unwrap().unwrap();
        assert_eq!(record.len(), 17);
        assert_eq!(&record[0], "runs/a,b.csv");
        assert_eq!(&record[1], "3");
        assert!(!row.ends_with('\n'));
    }

    #[test]
    fn test_text_mentions_cutoff() {
        let line = TextFormatter::new(false).format(&summary());
        assert!(line.contains("Wc: 10.0 rad/s"), "{}", line);
    }

    #[test]
    fn test_write_trace() {
        let signal = Signal::new(vec![0.0, 0.5], vec![1.0, 1.0]).unwrap();
        let mut buf = Vec::new();
        write_trace(&mut buf, &signal, &[0.0, 0.25]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Time (s),Channel 1 (V),Output (V)\n0,1,0\n0.5,1,0.25\n");
    }

    #[test]
    fn test_write_trace_length_mismatch() {
        let signal = Signal::new(vec![0.0, 0.5], vec![1.0, 1.0]).unwrap();
        assert!(write_trace(Vec::new(), &signal, &[0.0]).is_err());
    }
}
