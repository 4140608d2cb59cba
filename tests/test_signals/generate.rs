use lpfsim::data::{DataSource, Signal};
use lpfsim::simulation::{Waveform, generate_signal, sample_times};
use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Constant `level` from t = 0, uniformly sampled
pub fn step_signal(level: f64, duration_secs: f64, sample_rate: f64) -> Signal {
    generate_signal(
        &Waveform::Step {
            level,
            at_secs: 0.0,
        },
        duration_secs,
        sample_rate,
    )
}

/// Zero-offset sine, uniformly sampled
pub fn sine_signal(amplitude: f64, freq_hz: f64, duration_secs: f64, sample_rate: f64) -> Signal {
    generate_signal(
        &Waveform::Sine {
            amplitude,
            freq_hz,
            offset: 0.0,
        },
        duration_secs,
        sample_rate,
    )
}

/// Constant `level` sampled at irregular, strictly increasing instants,
/// as a scope with an unsteady clock would produce.
pub fn jittered_signal(level: f64, duration_secs: f64, sample_rate: f64, seed: u64) -> Signal {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let nominal = 1.0 / sample_rate;
    let mut time: Vec<f64> = sample_times(duration_secs, sample_rate)
        .into_iter()
        .map(|t| t + (rng.random::<f64>() - 0.5) * 0.8 * nominal)
        .collect();
    if let Some(first) = time.first_mut() {
        *first = 0.0;
    }
    let voltage = vec![level; time.len()];
    Signal::new(time, voltage).unwrap()
}

/// In-memory CSV source as an upload would provide it
pub fn csv_source(name: &str, contents: &str) -> DataSource {
    DataSource::Bytes {
        name: name.to_string(),
        bytes: contents.as_bytes().to_vec(),
    }
}
