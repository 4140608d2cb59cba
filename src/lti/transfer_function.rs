use num_complex::Complex64;

use crate::error::{LpfError, Result};

use super::matrix::Matrix;
use super::state_space::StateSpace;

/// Continuous-time SISO transfer function `H(s) = num(s) / den(s)`
///
/// Coefficients are stored highest power first and normalized so that the
/// leading denominator coefficient is 1.
///
/// # Example
/// ```
/// use lpfsim::lti::TransferFunction;
///
/// // H(s) = 10 / (s + 10)
/// let tf = TransferFunction::new(&[10.0], &[1.0, 10.0]).unwrap();
/// assert_eq!(tf.order(), 1);
/// assert!((tf.dc_gain() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    num: Vec<f64>,
    den: Vec<f64>,
}

impl TransferFunction {
    /// # Errors
    /// Returns `LpfError::FilterDesign` if a coefficient is not finite, the
    /// denominator is zero, or the system is improper.
    pub fn new(num: &[f64], den: &[f64]) -> Result<Self> {
        if num.iter().chain(den).any(|c| !c.is_finite()) {
            return Err(LpfError::FilterDesign(format!(
                "non-finite coefficient in num={:?} den={:?}",
                num, den
            )));
        }

        let den = strip_leading_zeros(den);
        let Some(&lead) = den.first() else {
            return Err(LpfError::FilterDesign("denominator is zero".to_string()));
        };

        let mut num = strip_leading_zeros(num);
        if num.is_empty() {
            num.push(0.0);
        }
        if num.len() > den.len() {
            return Err(LpfError::FilterDesign(format!(
                "improper transfer function: numerator order {} exceeds denominator order {}",
                num.len() - 1,
                den.len() - 1
            )));
        }

        Ok(Self {
            num: num.iter().map(|c| c / lead).collect(),
            den: den.iter().map(|c| c / lead).collect(),
        })
    }

    pub fn numerator(&self) -> &[f64] {
        &self.num
    }

    pub fn denominator(&self) -> &[f64] {
        &self.den
    }

    /// Number of poles.
    pub fn order(&self) -> usize {
        self.den.len() - 1
    }

    /// `H(0)`; infinite for systems with a pole at the origin.
    pub fn dc_gain(&self) -> f64 {
        let num0 = *self.num.last().unwrap_or(&0.0);
        let den0 = *self.den.last().unwrap_or(&1.0);
        num0 / den0
    }

    /// `H(jω)` for angular frequency `omega` in rad/s.
    pub fn frequency_response(&self, omega: f64) -> Complex64 {
        let s = Complex64::new(0.0, omega);
        polyval(&self.num, s) / polyval(&self.den, s)
    }

    /// Controllable canonical realization.
    ///
    /// For `den = [1, a1, .., an]` and the numerator padded to
    /// `[b0, b1, .., bn]`: the first row of `A` is `-[a1 .. an]` with ones on
    /// the subdiagonal, `B = e1`, `C[i] = b(i+1) - b0 * a(i+1)`, `D = b0`.
    pub fn to_state_space(&self) -> StateSpace {
        let n = self.order();

        let mut padded = vec![0.0; self.den.len() - self.num.len()];
        padded.extend_from_slice(&self.num);
        let d = padded[0];

        let mut a = Matrix::zeros(n, n);
        for j in 0..n {
            a[(0, j)] = -self.den[j + 1];
        }
        for i in 1..n {
            a[(i, i - 1)] = 1.0;
        }

        let mut b = vec![0.0; n];
        if n > 0 {
            b[0] = 1.0;
        }

        let c = (0..n).map(|i| padded[i + 1] - d * self.den[i + 1]).collect();

        StateSpace::new(a, b, c, d)
    }
}

fn strip_leading_zeros(coeffs: &[f64]) -> Vec<f64> {
    let first = coeffs.iter().position(|&c| c != 0.0).unwrap_or(coeffs.len());
    coeffs[first..].to_vec()
}

fn polyval(coeffs: &[f64], s: Complex64) -> Complex64 {
    coeffs
        .iter()
        .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * s + c)
}
