use crate::error::{LpfError, Result};

use super::state_space::{Discretized, StateSpace};

/// Relative step-size difference below which the previous discretization is
/// reused.
const STEP_REUSE_RTOL: f64 = 1e-9;

/// Time response of `system` to input `u` sampled at times `t`, starting from
/// the zero state.
///
/// The input is taken to vary linearly between samples and every interval is
/// propagated exactly, so the result does not depend on an integration step.
/// Uniformly sampled inputs pay for a single matrix exponential.
///
/// # Errors
/// - `LpfError::LengthMismatch` if `u` and `t` differ in length
/// - `LpfError::InsufficientData` for fewer than 2 time points
/// - `LpfError::NonFiniteTime` if a time point is NaN or infinite
/// - `LpfError::NonMonotonicTime` if time ever decreases
pub fn lsim(system: &StateSpace, u: &[f64], t: &[f64]) -> Result<Vec<f64>> {
    if u.len() != t.len() {
        return Err(LpfError::LengthMismatch {
            inputs: u.len(),
            times: t.len(),
        });
    }
    if t.len() < 2 {
        return Err(LpfError::InsufficientData {
            needed: 2,
            available: t.len(),
        });
    }

    if let Some(index) = t.iter().position(|v| !v.is_finite()) {
        return Err(LpfError::NonFiniteTime {
            index,
            value: t[index],
        });
    }

    let mut x = vec![0.0; system.order()];
    let mut y = Vec::with_capacity(u.len());
    y.push(system.output(&x, u[0]));

    let mut cached: Option<(f64, Discretized)> = None;
    let mut discretizations = 0usize;

    for k in 0..t.len() - 1 {
        let h = t[k + 1] - t[k];
        if h < 0.0 {
            return Err(LpfError::NonMonotonicTime {
                index: k + 1,
                previous: t[k],
                current: t[k + 1],
            });
        }

        if h > 0.0 {
            let reuse = matches!(&cached, Some((h0, _)) if (h - h0).abs() <= STEP_REUSE_RTOL * h0);
            if !reuse {
                cached = Some((h, system.discretize_foh(h)));
                discretizations += 1;
            }
            if let Some((_, disc)) = &cached {
                x = disc.step(&x, u[k], u[k + 1]);
            }
        }

        y.push(system.output(&x, u[k + 1]));
    }

    log::trace!(
        "lsim: {} samples, order {}, {} discretizations",
        u.len(),
        system.order(),
        discretizations
    );

    Ok(y)
}
