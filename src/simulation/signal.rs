use std::f64::consts::PI;

use crate::data::Signal;

/// Test waveform shapes
#[derive(Clone, Debug, PartialEq)]
pub enum Waveform {
    /// Jump from 0 to `level` at `at_secs`
    Step { level: f64, at_secs: f64 },
    /// `offset + amplitude * sin(2π f t)`
    Sine {
        amplitude: f64,
        freq_hz: f64,
        offset: f64,
    },
    /// `offset ± amplitude`, positive for the first half of each period
    Square {
        amplitude: f64,
        freq_hz: f64,
        offset: f64,
    },
}

impl Waveform {
    pub fn value_at(&self, t: f64) -> f64 {
        match *self {
            Waveform::Step { level, at_secs } => {
                if t >= at_secs {
                    level
                } else {
                    0.0
                }
            }
            Waveform::Sine {
                amplitude,
                freq_hz,
                offset,
            } => offset + amplitude * (2.0 * PI * freq_hz * t).sin(),
            Waveform::Square {
                amplitude,
                freq_hz,
                offset,
            } => {
                let phase = (t * freq_hz).rem_euclid(1.0);
                if phase < 0.5 {
                    offset + amplitude
                } else {
                    offset - amplitude
                }
            }
        }
    }
}

/// Uniform sample instants `i / sample_rate` covering `duration_secs`.
pub fn sample_times(duration_secs: f64, sample_rate: f64) -> Vec<f64> {
    let num_samples = (duration_secs * sample_rate).round() as usize;
    (0..num_samples).map(|i| i as f64 / sample_rate).collect()
}

/// Evaluate a waveform at the given times
pub fn generate_waveform(waveform: &Waveform, times: &[f64]) -> Vec<f64> {
    times.iter().map(|&t| waveform.value_at(t)).collect()
}

/// Uniformly sampled signal of the given shape
pub fn generate_signal(waveform: &Waveform, duration_secs: f64, sample_rate: f64) -> Signal {
    let time = sample_times(duration_secs, sample_rate);
    let voltage = generate_waveform(waveform, &time);
    Signal { time, voltage }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_times() {
        let t = sample_times(1.0, 4.0);
        assert_eq!(t, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_step() {
        let w = Waveform::Step {
            level: 2.0,
            at_secs: 0.5,
        };
        assert_eq!(w.value_at(0.49), 0.0);
        assert_eq!(w.value_at(0.5), 2.0);
    }

    #[test]
    fn test_square_halves() {
        let w = Waveform::Square {
            amplitude: 1.0,
            freq_hz: 2.0,
            offset: 0.5,
        };
        assert_eq!(w.value_at(0.1), 1.5);
        assert_eq!(w.value_at(0.3), -0.5);
    }

    #[test]
    fn test_generate_signal_lengths() {
        let s = generate_signal(
            &Waveform::Sine {
                amplitude: 1.0,
                freq_hz: 5.0,
                offset: 0.0,
            },
            2.0,
            1000.0,
        );
        assert_eq!(s.len(), 2000);
        assert_eq!(s.voltage.len(), s.time.len());
    }
}
