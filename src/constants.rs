//! Fixed values shared by the loader, the filter and the front ends.

/// CSV fetched when no file is supplied.
pub const DEFAULT_URL: &str = "https://raw.githubusercontent.com/TendoPain18/load-cell-transducer-signal-conditioning-circuit/main/data/Data_not_const_with_headers.csv";

/// Header of the time column (seconds).
pub const TIME_COLUMN: &str = "Time (s)";

/// Header of the input voltage column (volts).
pub const VOLTAGE_COLUMN: &str = "Channel 1 (V)";

/// Columns every input CSV must carry.
pub const REQUIRED_COLUMNS: [&str; 2] = [TIME_COLUMN, VOLTAGE_COLUMN];

/// Header used for the filtered trace on export.
pub const OUTPUT_COLUMN: &str = "Output (V)";

/// Feedback resistor of the conditioning stage, in ohms.
pub const FEEDBACK_RESISTANCE: f64 = 33_000.0;

/// Input resistor of the conditioning stage, in ohms.
pub const INPUT_RESISTANCE: f64 = 33_000.0;

pub const DEFAULT_CUTOFF_MIN: f64 = 0.0;
pub const DEFAULT_CUTOFF_MAX: f64 = 1000.0;
pub const DEFAULT_CUTOFF: f64 = 25.0;

/// Norm below which the matrix exponential skips squaring.
pub const EXPM_SCALE_THRESHOLD: f64 = 0.5;

/// Taylor terms used by the matrix exponential after scaling.
pub const EXPM_TAYLOR_TERMS: usize = 18;
