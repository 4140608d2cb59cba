use super::{Formatter, RunSummary};

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, summary: &RunSummary) -> String {
        serde_json::to_string(summary).unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e))
    }
}
