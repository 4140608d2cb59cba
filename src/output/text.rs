use super::{Formatter, RunSummary, TraceStats};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

fn describe(stats: Option<&TraceStats>) -> String {
    stats.map_or("-".to_string(), |s| {
        format!(
            "mean {:>8.4} V, std {:>7.4} V, range [{:.4}, {:.4}] V, final {:.4} V",
            s.mean, s.std_dev, s.min, s.max, s.final_value
        )
    })
}

impl Formatter for TextFormatter {
    fn format(&self, summary: &RunSummary) -> String {
        let head = format!(
            "{}: {} samples over {:.4} s, Wc: {:.1} rad/s ({:.2} Hz)",
            summary.source,
            summary.samples,
            summary.duration_secs,
            summary.cutoff_rad_s,
            summary.cutoff_hz
        );
        if self.verbose {
            format!(
                "{}\n  Rf/Ri:  {} / {}\n  Input:  {}\n  Output: {}",
                head,
                summary.rf,
                summary.ri,
                describe(summary.input.as_ref()),
                describe(summary.output.as_ref())
            )
        } else {
            format!(
                "{}\n  Input:  {}\n  Output: {}",
                head,
                describe(summary.input.as_ref()),
                describe(summary.output.as_ref())
            )
        }
    }
}
