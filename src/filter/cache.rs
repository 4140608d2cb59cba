use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;

use super::lowpass::{FilterParams, LowPassSimulator};

/// Computes a filter response; the unit of work [`FilterCache`] memoizes
pub trait ResponseSimulator {
    fn simulate(&self, vin: &[f64], t: &[f64], params: &FilterParams) -> Result<Vec<f64>>;
}

/// Exact-value key over every argument of a simulation.
///
/// Floats are compared by bit pattern, so `0.0` and `-0.0` are different
/// keys and identical NaNs match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    vin: Box<[u64]>,
    t: Box<[u64]>,
    cutoff: u64,
    ri: u64,
    rf: u64,
}

impl CacheKey {
    fn new(vin: &[f64], t: &[f64], params: &FilterParams) -> Self {
        Self {
            vin: vin.iter().map(|v| v.to_bits()).collect(),
            t: t.iter().map(|v| v.to_bits()).collect(),
            cutoff: params.cutoff.to_bits(),
            ri: params.ri.to_bits(),
            rf: params.rf.to_bits(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Memoizes filter responses by argument value
///
/// Entries never expire; a repeated call with equal arguments returns the
/// stored response without running the simulator. Failed simulations are
/// not stored.
///
/// # Example
/// ```
/// use lpfsim::config::CircuitConfig;
/// use lpfsim::filter::{FilterCache, FilterParams};
///
/// let mut cache = FilterCache::new();
/// let params = FilterParams::new(1.0, &CircuitConfig::default());
/// let t = [0.0, 1.0, 2.0];
/// let vin = [1.0, 1.0, 1.0];
///
/// let first = cache.evaluate(&vin, &t, &params).unwrap();
/// let second = cache.evaluate(&vin, &t, &params).unwrap();
/// assert_eq!(first, second);
/// assert_eq!(cache.stats().hits, 1);
/// ```
pub struct FilterCache<S = LowPassSimulator> {
    simulator: S,
    entries: HashMap<CacheKey, Arc<[f64]>>,
    hits: u64,
    misses: u64,
}

impl FilterCache<LowPassSimulator> {
    pub fn new() -> Self {
        Self::with_simulator(LowPassSimulator)
    }
}

impl Default for FilterCache<LowPassSimulator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ResponseSimulator> FilterCache<S> {
    pub fn with_simulator(simulator: S) -> Self {
        Self {
            simulator,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Filter `vin` sampled at `t`, reusing a stored response when one exists
    /// for exactly these arguments.
    ///
    /// # Errors
    /// Propagates the simulator's error unchanged.
    pub fn evaluate(&mut self, vin: &[f64], t: &[f64], params: &FilterParams) -> Result<Arc<[f64]>> {
        let key = CacheKey::new(vin, t, params);
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            log::trace!("Filter cache hit (Wc={})", params.cutoff);
            return Ok(Arc::clone(hit));
        }

        self.misses += 1;
        log::debug!(
            "Filter cache miss: simulating {} samples at Wc={}",
            vin.len(),
            params.cutoff
        );
        let output: Arc<[f64]> = self.simulator.simulate(vin, t, params)?.into();
        self.entries.insert(key, Arc::clone(&output));
        Ok(output)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every stored response. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn simulator(&self) -> &S {
        &self.simulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CircuitConfig;
    use crate::error::LpfError;
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingSimulator {
        calls: Cell<usize>,
    }

    impl ResponseSimulator for CountingSimulator {
        fn simulate(&self, vin: &[f64], t: &[f64], params: &FilterParams) -> Result<Vec<f64>> {
            self.calls.set(self.calls.get() + 1);
            crate::filter::compute_output(vin, t, params)
        }
    }

    fn params(cutoff: f64) -> FilterParams {
        FilterParams::new(cutoff, &CircuitConfig::default())
    }

    #[test]
    fn test_identical_arguments_simulate_once() {
        let mut cache = FilterCache::with_simulator(CountingSimulator::default());
        let t = [0.0, 0.1, 0.2, 0.3];
        let vin = [0.0, 1.0, 1.0, 0.5];

        let a = cache.evaluate(&vin, &t, &params(10.0)).unwrap();
        let b = cache.evaluate(&vin, &t, &params(10.0)).unwrap();

        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.simulator().calls.get(), 1);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn test_any_changed_argument_recomputes() {
        let mut cache = FilterCache::with_simulator(CountingSimulator::default());
        let t = [0.0, 0.1, 0.2];
        let vin = [1.0, 1.0, 1.0];

        cache.evaluate(&vin, &t, &params(10.0)).unwrap();
        cache.evaluate(&vin, &t, &params(11.0)).unwrap();
        cache.evaluate(&[1.0, 1.0, 2.0], &t, &params(10.0)).unwrap();
        cache.evaluate(&vin, &[0.0, 0.1, 0.3], &params(10.0)).unwrap();
        let mut other = params(10.0);
        other.rf = 10_000.0;
        cache.evaluate(&vin, &t, &other).unwrap();

        assert_eq!(cache.simulator().calls.get(), 5);
        assert_eq!(cache.len(), 5);

        // Earlier entries are still served
        cache.evaluate(&vin, &t, &params(11.0)).unwrap();
        assert_eq!(cache.simulator().calls.get(), 5);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache = FilterCache::with_simulator(CountingSimulator::default());
        let t = [0.0, 1.0];
        let vin = [1.0, 1.0];

        for _ in 0..2 {
            assert!(matches!(
                cache.evaluate(&vin, &t, &params(f64::NAN)),
                Err(LpfError::FilterDesign(_))
            ));
        }
        assert_eq!(cache.simulator().calls.get(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_forces_recompute() {
        let mut cache = FilterCache::with_simulator(CountingSimulator::default());
        let t = [0.0, 1.0];
        let vin = [1.0, 1.0];
        cache.evaluate(&vin, &t, &params(2.0)).unwrap();
        cache.clear();
        cache.evaluate(&vin, &t, &params(2.0)).unwrap();
        assert_eq!(cache.simulator().calls.get(), 2);
    }
}
