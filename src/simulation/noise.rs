use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Impairments applied to a clean voltage trace
///
/// Every field is optional so a TOML profile only names what it wants:
///
/// ```toml
/// seed = 7
///
/// [additive]
/// snr_db = 20.0
///
/// [drift]
/// volts_per_sec = 0.05
/// ```
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct NoiseConfig {
    pub seed: Option<u64>,
    pub additive: Option<AdditiveNoiseConfig>,
    pub drift: Option<OffsetDriftConfig>,
    pub impulse: Option<ImpulseNoiseConfig>,
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_awgn(mut self, snr_db: f64) -> Self {
        self.additive = Some(AdditiveNoiseConfig { snr_db });
        self
    }

    pub fn with_drift(mut self, volts_per_sec: f64) -> Self {
        self.drift = Some(OffsetDriftConfig { volts_per_sec });
        self
    }

    pub fn with_impulse(mut self, rate_hz: f64, amplitude: f64, duration_samples: usize) -> Self {
        self.impulse = Some(ImpulseNoiseConfig {
            rate_hz,
            amplitude,
            duration_samples,
        });
        self
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct AdditiveNoiseConfig {
    pub snr_db: f64,
}

/// Linear baseline drift, as from a warming probe
#[derive(Clone, Debug, serde::Deserialize)]
pub struct OffsetDriftConfig {
    pub volts_per_sec: f64,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct ImpulseNoiseConfig {
    pub rate_hz: f64,
    pub amplitude: f64,
    pub duration_samples: usize,
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

/// Mean square of the samples
pub fn signal_power(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().map(|&x| x * x).sum::<f64>() / signal.len() as f64
}

fn apply_additive_noise(signal: &mut [f64], config: &AdditiveNoiseConfig, rng: &mut ChaCha8Rng) {
    let sig_power = signal_power(signal);
    if sig_power == 0.0 {
        return;
    }

    let snr_linear = 10.0_f64.powf(config.snr_db / 10.0);
    let noise_std = (sig_power / snr_linear).sqrt();

    let Ok(normal) = Normal::new(0.0, noise_std) else {
        log::warn!("Skipping AWGN: invalid noise level {}", noise_std);
        return;
    };

    for sample in signal.iter_mut() {
        *sample += normal.sample(rng);
    }
}

fn apply_drift(signal: &mut [f64], times: &[f64], config: &OffsetDriftConfig) {
    let Some(&t0) = times.first() else {
        return;
    };
    for (sample, &t) in signal.iter_mut().zip(times) {
        *sample += config.volts_per_sec * (t - t0);
    }
}

fn apply_impulse_noise(
    signal: &mut [f64],
    config: &ImpulseNoiseConfig,
    sample_rate: f64,
    rng: &mut ChaCha8Rng,
) {
    let n = signal.len();
    if n == 0 || config.rate_hz <= 0.0 {
        return;
    }

    let avg_samples_between_impulses = sample_rate / config.rate_hz;

    let mut pos = 0usize;
    loop {
        let interval = (rng.random::<f64>() * 2.0 * avg_samples_between_impulses) as usize;
        pos += interval.max(1);

        if pos >= n {
            break;
        }

        let sign = if rng.random::<bool>() { 1.0 } else { -1.0 };
        let end = (pos + config.duration_samples).min(n);

        for sample in signal[pos..end].iter_mut() {
            *sample += sign * config.amplitude;
        }
    }
}

/// Copy of `clean` with the configured impairments applied.
///
/// `times` are the sample instants of `clean`; the nominal sample rate used
/// for impulse spacing is derived from their mean spacing.
pub fn apply_noise(clean: &[f64], times: &[f64], config: &NoiseConfig) -> Vec<f64> {
    let mut signal = clean.to_vec();
    let mut rng = create_rng(config.seed);

    if let Some(ref drift_config) = config.drift {
        apply_drift(&mut signal, times, drift_config);
    }

    if let Some(ref impulse_config) = config.impulse {
        let sample_rate = match (times.first(), times.last()) {
            (Some(first), Some(last)) if times.len() > 1 && last > first => {
                (times.len() - 1) as f64 / (last - first)
            }
            _ => 1.0,
        };
        apply_impulse_noise(&mut signal, impulse_config, sample_rate, &mut rng);
    }

    if let Some(ref additive_config) = config.additive {
        apply_additive_noise(&mut signal, additive_config, &mut rng);
    }

    signal
}
