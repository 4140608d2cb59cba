//! Configuration for the low-pass filter simulator.
//!
//! All settings live in plain structs with sensible `Default`s. Front ends
//! build an `AppConfig::default()` and override fields from their command
//! line; nothing here is read from or written to disk.
//!
//! ```
//! use lpfsim::config::AppConfig;
//!
//! let mut config = AppConfig::default();
//! config.circuit.rf = 66_000.0;
//! assert_eq!(config.circuit.gain(), 2.0);
//! ```

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_CUTOFF, DEFAULT_CUTOFF_MAX, DEFAULT_CUTOFF_MIN, DEFAULT_URL, FEEDBACK_RESISTANCE,
    INPUT_RESISTANCE,
};
use crate::error::{LpfError, Result};

/// Cutoff frequency specification
///
/// Stored as an angular frequency in rad/s, which is what the filter uses.
///
/// # Parsing formats
/// - `25` - angular frequency in rad/s (no suffix)
/// - `25rad/s` - angular frequency in rad/s (explicit)
/// - `4hz` or `4Hz` - ordinary frequency in Hz, converted with 2π
///
/// # Example
/// ```
/// use lpfsim::config::CutoffFrequency;
///
/// let wc: CutoffFrequency = "1hz".parse().unwrap();
/// assert!((wc.as_rad_per_sec() - 2.0 * std::f64::consts::PI).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutoffFrequency(f64);

impl CutoffFrequency {
    /// Create from angular frequency in rad/s
    pub fn from_rad_per_sec(wc: f64) -> Self {
        Self(wc)
    }

    /// Create from frequency in Hz
    pub fn from_hz(hz: f64) -> Self {
        Self(2.0 * PI * hz)
    }

    pub fn as_rad_per_sec(&self) -> f64 {
        self.0
    }

    pub fn as_hz(&self) -> f64 {
        self.0 / (2.0 * PI)
    }
}

impl Default for CutoffFrequency {
    fn default() -> Self {
        Self(DEFAULT_CUTOFF)
    }
}

impl fmt::Display for CutoffFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}rad/s", self.0)
    }
}

impl FromStr for CutoffFrequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(num) = s
            .strip_suffix("hz")
            .or_else(|| s.strip_suffix("Hz"))
            .or_else(|| s.strip_suffix("HZ"))
        {
            let hz: f64 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid frequency: {}", s))?;
            if hz <= 0.0 || !hz.is_finite() {
                return Err("frequency must be positive".to_string());
            }
            return Ok(Self::from_hz(hz));
        }

        let num = s.strip_suffix("rad/s").unwrap_or(s);
        let wc: f64 = num
            .trim()
            .parse()
            .map_err(|_| format!("invalid cutoff: {}", s))?;
        if wc <= 0.0 || !wc.is_finite() {
            return Err("cutoff must be positive".to_string());
        }
        Ok(Self::from_rad_per_sec(wc))
    }
}

/// Bounds of the cutoff selector
///
/// Always satisfies `min < max`; construct through [`CutoffRange::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutoffRange {
    min: f64,
    max: f64,
}

impl CutoffRange {
    /// # Errors
    /// Returns `LpfError::InvalidRange` unless both bounds are finite and
    /// `min < max`.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(LpfError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl Default for CutoffRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_CUTOFF_MIN,
            max: DEFAULT_CUTOFF_MAX,
        }
    }
}

/// Application-wide configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Where data comes from when nothing is supplied
    pub source: SourceConfig,
    /// Resistor values of the conditioning stage
    pub circuit: CircuitConfig,
    /// Cutoff selector bounds and starting value
    pub cutoff: CutoffConfig,
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// CSV fetched when no file is given
    pub default_url: String,
}

/// Inverting op-amp stage resistors
#[derive(Debug, Clone, Copy)]
pub struct CircuitConfig {
    /// Feedback resistance in ohms
    pub rf: f64,
    /// Input resistance in ohms
    pub ri: f64,
}

impl CircuitConfig {
    /// Magnitude of the stage gain, `Rf / Ri`
    pub fn gain(&self) -> f64 {
        self.rf / self.ri
    }

    pub fn validate(&self) -> Result<()> {
        if self.rf <= 0.0 || !self.rf.is_finite() {
            return Err(LpfError::Config(format!(
                "feedback resistance must be positive, got {}",
                self.rf
            )));
        }
        if self.ri <= 0.0 || !self.ri.is_finite() {
            return Err(LpfError::Config(format!(
                "input resistance must be positive, got {}",
                self.ri
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CutoffConfig {
    pub range: CutoffRange,
    /// Selected cutoff on startup; clamped into `range`
    pub initial: f64,
}

impl CutoffConfig {
    pub fn initial_cutoff(&self) -> f64 {
        self.range.clamp(self.initial)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            default_url: DEFAULT_URL.to_string(),
        }
    }
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            rf: FEEDBACK_RESISTANCE,
            ri: INPUT_RESISTANCE,
        }
    }
}

impl Default for CutoffConfig {
    fn default() -> Self {
        Self {
            range: CutoffRange::default(),
            initial: DEFAULT_CUTOFF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutoff_plain_number() {
        let wc: CutoffFrequency = "25".parse().unwrap();
        assert_eq!(wc.as_rad_per_sec(), 25.0);
    }

    #[test]
    fn test_cutoff_explicit_rad_per_sec() {
        let wc: CutoffFrequency = "25rad/s".parse().unwrap();
        assert_eq!(wc.as_rad_per_sec(), 25.0);
    }

    #[test]
    fn test_cutoff_from_hz() {
        let wc: CutoffFrequency = "4Hz".parse().unwrap();
        assert!((wc.as_rad_per_sec() - 8.0 * PI).abs() < 1e-12);
        assert!((wc.as_hz() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_cutoff_invalid() {
        assert!("abc".parse::<CutoffFrequency>().is_err());
        assert!("0".parse::<CutoffFrequency>().is_err());
        assert!("-3hz".parse::<CutoffFrequency>().is_err());
        assert!("NaN".parse::<CutoffFrequency>().is_err());
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert!(CutoffRange::new(10.0, 10.0).is_err());
        assert!(CutoffRange::new(10.0, 5.0).is_err());
        assert!(CutoffRange::new(f64::NAN, 5.0).is_err());
        assert!(CutoffRange::new(1.0, 5.0).is_ok());
    }

    #[test]
    fn test_initial_cutoff_limited_by_max() {
        let config = CutoffConfig {
            range: CutoffRange::new(0.0, 10.0).unwrap(),
            initial: 25.0,
        };
        assert_eq!(config.initial_cutoff(), 10.0);
        assert_eq!(CutoffConfig::default().initial_cutoff(), 25.0);
    }

    #[test]
    fn test_circuit_defaults_unity_gain() {
        let circuit = CircuitConfig::default();
        assert_eq!(circuit.gain(), 1.0);
        assert!(circuit.validate().is_ok());

        let bad = CircuitConfig { rf: 0.0, ri: 1.0 };
        assert!(bad.validate().is_err());
    }
}
