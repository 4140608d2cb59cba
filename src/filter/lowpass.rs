use crate::config::CircuitConfig;
use crate::error::{LpfError, Result};
use crate::lti::{TransferFunction, lsim};

use super::cache::ResponseSimulator;

/// Parameters of the inverting single-pole low-pass stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Cutoff angular frequency Wc in rad/s
    pub cutoff: f64,
    /// Feedback resistance in ohms
    pub rf: f64,
    /// Input resistance in ohms
    pub ri: f64,
}

impl FilterParams {
    pub fn new(cutoff: f64, circuit: &CircuitConfig) -> Self {
        Self {
            cutoff,
            rf: circuit.rf,
            ri: circuit.ri,
        }
    }

    /// Magnitude of the stage gain, `Rf / Ri`
    pub fn gain(&self) -> f64 {
        self.rf / self.ri
    }

    /// Time for the step response to settle within 1% (≈ 5 time constants).
    pub fn settling_time(&self) -> f64 {
        5.0 / self.cutoff
    }
}

/// `H(s) = -(Rf/Ri) Wc / (s + Wc)`: single pole at `-Wc`, inverted polarity.
///
/// # Errors
/// Returns `LpfError::FilterDesign` if the cutoff is not finite or either
/// resistance is not a positive finite number. A zero cutoff is accepted and
/// yields a system whose response is identically zero.
pub fn lowpass_transfer_function(params: &FilterParams) -> Result<TransferFunction> {
    let FilterParams { cutoff, rf, ri } = *params;
    if !cutoff.is_finite() {
        return Err(LpfError::FilterDesign(format!(
            "cutoff must be finite, got {}",
            cutoff
        )));
    }
    if rf <= 0.0 || ri <= 0.0 || !rf.is_finite() || !ri.is_finite() {
        return Err(LpfError::FilterDesign(format!(
            "resistances must be positive, got Rf={} Ri={}",
            rf, ri
        )));
    }

    TransferFunction::new(&[-params.gain() * cutoff], &[1.0, cutoff])
}

/// Response of the conditioning stage to `vin` sampled at `t`.
///
/// Simulates the inverting transfer function from zero initial state, then
/// scales by `-(Rf/Ri)` to undo the inversion. With equal resistors the
/// result is a unity-gain low-pass of the input.
///
/// # Errors
/// Propagates filter design and simulation errors unchanged.
pub fn compute_output(vin: &[f64], t: &[f64], params: &FilterParams) -> Result<Vec<f64>> {
    let system = lowpass_transfer_function(params)?.to_state_space();
    let inverted = lsim(&system, vin, t)?;
    let k = -params.gain();
    Ok(inverted.into_iter().map(|v| v * k).collect())
}

/// Production simulator: [`compute_output`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LowPassSimulator;

impl ResponseSimulator for LowPassSimulator {
    fn simulate(&self, vin: &[f64], t: &[f64], params: &FilterParams) -> Result<Vec<f64>> {
        compute_output(vin, t, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(cutoff: f64) -> FilterParams {
        FilterParams::new(cutoff, &CircuitConfig::default())
    }

    #[test]
    fn test_transfer_function_coefficients() {
        let tf = lowpass_transfer_function(&FilterParams {
            cutoff: 10.0,
            rf: 66_000.0,
            ri: 33_000.0,
        })
        .unwrap();
        assert_eq!(tf.numerator(), &[-20.0]);
        assert_eq!(tf.denominator(), &[1.0, 10.0]);
        assert_relative_eq!(tf.dc_gain(), -2.0);
    }

    #[test]
    fn test_unit_step_example() {
        let vin = [1.0, 1.0, 1.0, 1.0, 1.0];
        let t = [0.0, 1.0, 2.0, 3.0, 4.0];
        let vout = compute_output(&vin, &t, &params(1.0)).unwrap();

        assert_eq!(vout.len(), 5);
        assert_eq!(vout[0], 0.0);
        for w in vout.windows(2) {
            assert!(w[1] > w[0], "output must rise monotonically: {:?}", vout);
        }
        for (ti, v) in t.iter().zip(&vout) {
            assert_relative_eq!(*v, 1.0 - (-ti).exp(), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_net_gain_is_square_of_resistor_ratio() {
        let p = FilterParams {
            cutoff: 50.0,
            rf: 2.0,
            ri: 1.0,
        };
        let t: Vec<f64> = (0..500).map(|i| i as f64 * 0.001).collect();
        let vin = vec![1.0; t.len()];
        let vout = compute_output(&vin, &t, &p).unwrap();
        assert_relative_eq!(*vout.last().unwrap(), 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_cutoff_gives_zero_output() {
        let vout = compute_output(&[1.0, 1.0, 1.0], &[0.0, 1.0, 2.0], &params(0.0)).unwrap();
        assert_eq!(vout, vec![0.0; 3]);
    }

    #[test]
    fn test_rejects_non_finite_cutoff() {
        let t = [0.0, 1.0];
        let vin = [1.0, 1.0];
        for cutoff in [f64::NAN, f64::INFINITY] {
            assert!(matches!(
                compute_output(&vin, &t, &params(cutoff)),
                Err(LpfError::FilterDesign(_))
            ));
        }
    }

    #[test]
    fn test_single_sample_is_insufficient() {
        assert!(matches!(
            compute_output(&[1.0], &[0.0], &params(1.0)),
            Err(LpfError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_settling_time() {
        assert_eq!(params(25.0).settling_time(), 0.2);
    }
}
