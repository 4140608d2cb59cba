pub mod generate;

pub use generate::{csv_source, jittered_signal, sine_signal, step_signal};
