use super::{Formatter, RunSummary, TraceStats};

pub struct CsvFormatter;

fn stats_fields(stats: Option<&TraceStats>) -> [String; 5] {
    match stats {
        Some(s) => [s.mean, s.std_dev, s.min, s.max, s.final_value].map(|v| format!("{:.6}", v)),
        None => Default::default(),
    }
}

impl CsvFormatter {
    fn record(summary: &RunSummary) -> Vec<String> {
        let mut fields = vec![
            summary.source.clone(),
            summary.samples.to_string(),
            format!("{:.6}", summary.duration_secs),
            format!("{:.3}", summary.cutoff_rad_s),
            format!("{:.3}", summary.cutoff_hz),
            summary.rf.to_string(),
            summary.ri.to_string(),
        ];
        fields.extend(stats_fields(summary.input.as_ref()));
        fields.extend(stats_fields(summary.output.as_ref()));
        fields
    }
}

impl Formatter for CsvFormatter {
    fn format(&self, summary: &RunSummary) -> String {
        // Quoting is left to the writer so sources containing commas stay in one column
        let mut wtr = ::csv::WriterBuilder::new()
            .terminator(::csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        let row = wtr
            .write_record(Self::record(summary))
            .map_err(|e| e.to_string())
            .and_then(|()| wtr.into_inner().map_err(|e| e.to_string()))
            .and_then(|buf| String::from_utf8(buf).map_err(|e| e.to_string()));
        match row {
            Ok(line) => line.trim_end_matches('\n').to_string(),
            Err(e) => format!("error,{}", e),
        }
    }

    fn header(&self) -> Option<&'static str> {
        Some(
            "source,samples,duration_s,wc_rad_s,wc_hz,rf,ri,in_mean,in_std,in_min,in_max,in_final,out_mean,out_std,out_min,out_max,out_final",
        )
    }
}
