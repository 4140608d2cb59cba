/// Last `fraction` of a trace, at least one sample if non-empty.
pub fn tail(samples: &[f64], fraction: f64) -> &[f64] {
    let keep = ((samples.len() as f64 * fraction).ceil() as usize).clamp(1, samples.len().max(1));
    &samples[samples.len().saturating_sub(keep)..]
}

/// Half the peak-to-peak excursion.
pub fn amplitude(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
    (max - min) / 2.0
}

/// Mean of the last `fraction` of a trace; where a settled response sits.
pub fn mean_of_tail(samples: &[f64], fraction: f64) -> f64 {
    let t = tail(samples, fraction);
    if t.is_empty() {
        return 0.0;
    }
    t.iter().sum::<f64>() / t.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail() {
        let s = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(tail(&s, 0.5), &[3.0, 4.0]);
        assert_eq!(tail(&s, 0.0), &[4.0]);
        assert!(tail(&[], 0.5).is_empty());
    }

    #[test]
    fn test_amplitude() {
        assert_eq!(amplitude(&[-1.0, 0.0, 3.0]), 2.0);
        assert_eq!(amplitude(&[]), 0.0);
    }

    #[test]
    fn test_mean_of_tail() {
        assert_eq!(mean_of_tail(&[0.0, 0.0, 2.0, 4.0], 0.5), 3.0);
    }
}
