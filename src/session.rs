//! Interactive session state.
//!
//! Everything the UI remembers between frames lives in one explicitly
//! constructed [`Session`]: the data source and loaded signal, the cutoff
//! range and selected cutoff, and the last status message. Transitions are
//! plain methods so they can be exercised without a window.

use std::sync::Arc;

use crate::config::{AppConfig, CircuitConfig, CutoffRange};
use crate::data::{DataSource, Signal};
use crate::error::{LpfError, Result};
use crate::filter::{FilterCache, FilterParams, ResponseSimulator};

/// Message shown to the user after the last action
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Success(String),
    Error(String),
}

impl Status {
    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Status::Info(m) | Status::Success(m) | Status::Error(m) => m,
        }
    }
}

/// Outcome of the most recent load
#[derive(Debug, Clone)]
pub enum DataState {
    Loaded(Arc<Signal>),
    /// Load or schema failure; nothing downstream is computed
    Failed(String),
    NotLoaded,
}

pub struct Session {
    config: AppConfig,
    source: DataSource,
    data: DataState,
    range: CutoffRange,
    cutoff: f64,
    /// Values typed into the range inputs, applied on request
    pub pending_min: f64,
    pub pending_max: f64,
    status: Option<Status>,
    /// Set between `begin_load` and `finish_load`
    loading: bool,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        let range = config.cutoff.range;
        let cutoff = config.cutoff.initial_cutoff();
        let source = DataSource::Url(config.source.default_url.clone());
        Self {
            config,
            source,
            data: DataState::NotLoaded,
            range,
            cutoff,
            pending_min: range.min(),
            pending_max: range.max(),
            status: None,
            loading: false,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn circuit(&self) -> &CircuitConfig {
        &self.config.circuit
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn data(&self) -> &DataState {
        &self.data
    }

    pub fn signal(&self) -> Option<&Arc<Signal>> {
        match &self.data {
            DataState::Loaded(signal) => Some(signal),
            _ => None,
        }
    }

    pub fn range(&self) -> CutoffRange {
        self.range
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = Some(status);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replace the data source and load it.
    pub fn load(&mut self, source: DataSource) -> Result<()> {
        self.source = source;
        self.reload()
    }

    /// Point the session at a new source without loading it.
    pub fn set_source(&mut self, source: DataSource) {
        self.source = source;
    }

    /// Mark a background load of `source` as started.
    ///
    /// Returns `false` and changes nothing while another load is running, so
    /// at most one result is ever pending.
    pub fn begin_load(&mut self, source: &DataSource) -> bool {
        if self.loading {
            log::warn!("Ignoring {} while a load is in progress", source);
            return false;
        }
        log::info!("Loading {}", source);
        self.loading = true;
        self.status = Some(Status::Info(format!("Loading {}...", source)));
        true
    }

    /// Load the current source again.
    ///
    /// Any failure leaves the session without data until the next
    /// successful load.
    pub fn reload(&mut self) -> Result<()> {
        let source = self.source.clone();
        let result = Signal::load(&source);
        self.finish_load(source, result)
    }

    /// Record the outcome of loading `source`, which may have been read
    /// elsewhere (e.g. on a worker thread).
    pub fn finish_load(&mut self, source: DataSource, result: Result<Signal>) -> Result<()> {
        let is_default =
            matches!(&source, DataSource::Url(u) if *u == self.config.source.default_url);
        self.source = source;
        self.loading = false;
        match result {
            Ok(signal) => {
                let status = if is_default {
                    Status::Info(format!("Using default CSV ({} samples)", signal.len()))
                } else {
                    Status::Success(format!(
                        "Custom CSV loaded successfully ({} samples)",
                        signal.len()
                    ))
                };
                self.data = DataState::Loaded(Arc::new(signal));
                self.status = Some(status);
                Ok(())
            }
            Err(e) => {
                log::error!("{}", e);
                self.data = DataState::Failed(e.to_string());
                self.status = Some(Status::Error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Install an already-loaded signal (used by tests and tools).
    pub fn set_signal(&mut self, signal: Signal) {
        self.data = DataState::Loaded(Arc::new(signal));
    }

    /// Apply the pending range inputs.
    pub fn apply_pending_range(&mut self) -> Result<()> {
        self.apply_range(self.pending_min, self.pending_max)
    }

    /// Replace the cutoff range.
    ///
    /// An invalid range is rejected and the previous range kept. On success
    /// the selected cutoff is clamped into the new bounds. A failed load keeps
    /// its error as the status, since the charts stay hidden until it is fixed.
    pub fn apply_range(&mut self, min: f64, max: f64) -> Result<()> {
        match CutoffRange::new(min, max) {
            Ok(range) => {
                self.range = range;
                self.cutoff = range.clamp(self.cutoff);
                if !matches!(self.data, DataState::Failed(_)) {
                    self.status = Some(Status::Success(format!(
                        "Range updated to: {} → {}",
                        min, max
                    )));
                }
                log::info!("Cutoff range set to {}..{}", min, max);
                Ok(())
            }
            Err(e) => {
                self.pending_min = self.range.min();
                self.pending_max = self.range.max();
                self.status = Some(Status::Error(
                    "Min value must be LESS than Max value!".to_string(),
                ));
                log::warn!("{}", e);
                Err(e)
            }
        }
    }

    /// Select a cutoff; values outside the range are clamped.
    pub fn set_cutoff(&mut self, cutoff: f64) {
        self.cutoff = self.range.clamp(cutoff);
    }

    pub fn filter_params(&self) -> FilterParams {
        FilterParams::new(self.cutoff, &self.config.circuit)
    }

    /// Filtered output for the loaded signal at the selected cutoff.
    ///
    /// # Errors
    /// `LpfError::Load` if no signal is loaded; otherwise whatever the
    /// simulation reports.
    pub fn evaluate<S: ResponseSimulator>(&self, cache: &mut FilterCache<S>) -> Result<Arc<[f64]>> {
        let signal = match &self.data {
            DataState::Loaded(signal) => signal,
            DataState::Failed(msg) => return Err(LpfError::Load(msg.clone())),
            DataState::NotLoaded => return Err(LpfError::Load("no data loaded".to_string())),
        };
        cache.evaluate(&signal.voltage, &signal.time, &self.filter_params())
    }
}
