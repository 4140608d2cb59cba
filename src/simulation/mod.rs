mod measure;
mod noise;
mod signal;

pub use measure::{amplitude, mean_of_tail, tail};
pub use noise::{
    AdditiveNoiseConfig, ImpulseNoiseConfig, NoiseConfig, OffsetDriftConfig, apply_noise,
    signal_power,
};
pub use signal::{Waveform, generate_signal, generate_waveform, sample_times};
