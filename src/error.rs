use thiserror::Error;

#[derive(Error, Debug)]
pub enum LpfError {
    #[error("Error loading CSV: {0}")]
    Load(String),

    #[error("CSV missing required columns: {missing:?}")]
    Schema { missing: Vec<String> },

    #[error("Filter design failed: {0}")]
    FilterDesign(String),

    #[error("Insufficient data: need {needed} samples, have {available}")]
    InsufficientData { needed: usize, available: usize },

    #[error("Length mismatch: {inputs} input samples for {times} time points")]
    LengthMismatch { inputs: usize, times: usize },

    #[error("Time decreases at sample {index} ({previous} -> {current})")]
    NonMonotonicTime {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("Non-finite time {value} at sample {index}")]
    NonFiniteTime { index: usize, value: f64 },

    #[error("Invalid cutoff range: min ({min}) must be less than max ({max})")]
    InvalidRange { min: f64, max: f64 },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<csv::Error> for LpfError {
    fn from(e: csv::Error) -> Self {
        LpfError::Load(e.to_string())
    }
}

impl From<reqwest::Error> for LpfError {
    fn from(e: reqwest::Error) -> Self {
        LpfError::Load(e.to_string())
    }
}

impl From<std::io::Error> for LpfError {
    fn from(e: std::io::Error) -> Self {
        LpfError::Load(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LpfError>;
