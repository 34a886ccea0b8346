//! Watch registry — per-instrument price windows, curvature history, and
//! trigger bounds.
//!
//! The registry has exactly one writer: the detector actor that owns it.
//! Everything else sees immutable report copies, so none of this needs
//! locking.

use std::collections::HashMap;

use tapewatch_core::{InstrumentKey, SnapshotEntry, WatchError, WatchReport, SCALES};

use crate::curvature::curvature;
use crate::series::{stride, PriceWindow, ScaleSeries};
use crate::threshold::ThresholdState;

/// Everything tracked for one instrument.
#[derive(Debug, Clone, Default)]
pub struct InstrumentState {
    prices: PriceWindow,
    series: [ScaleSeries; SCALES],
    thresholds: [ThresholdState; SCALES],
}

/// Outcome of a watch request.
#[derive(Debug, Clone, Default)]
pub struct AddReport {
    pub added: Vec<InstrumentKey>,
    pub already_watched: Vec<InstrumentKey>,
}

pub struct WatchRegistry {
    instruments: HashMap<InstrumentKey, InstrumentState>,
    defaults: Vec<InstrumentKey>,
    nsd: f64,
}

impl WatchRegistry {
    /// Creates a registry with the configured stdev multiplier and
    /// default watchlist (whitespace-delimited tickers). Unparseable
    /// watchlist entries are skipped with a warning. Defaults are
    /// included immediately.
    #[must_use]
    pub fn new(nsd: f64, default_watchlist: &str) -> Self {
        let defaults = default_watchlist
            .split_whitespace()
            .filter_map(|token| match InstrumentKey::parse(token) {
                Ok(key) => Some(key),
                Err(e) => {
                    tracing::warn!(token, error = %e, "Skipping unparseable watchlist entry");
                    None
                }
            })
            .collect();
        let mut registry = Self {
            instruments: HashMap::new(),
            defaults,
            nsd,
        };
        registry.ensure_defaults();
        registry
    }

    fn ensure_defaults(&mut self) {
        for key in self.defaults.clone() {
            self.instruments.entry(key).or_default();
        }
    }

    /// Start watching the given instrument specs.
    ///
    /// Symbols are uppercase-normalized. Instruments already watched
    /// keep their accumulated history and are reported back rather than
    /// reset. The configured default watchlist is re-ensured on every
    /// call.
    ///
    /// # Errors
    /// Returns [`WatchError::BadInstrument`] for an unparseable spec;
    /// specs before it in the list are still added.
    pub fn add(&mut self, specs: &[String]) -> Result<AddReport, WatchError> {
        let mut report = AddReport::default();
        for spec in specs {
            let key = InstrumentKey::parse(spec)?;
            if self.instruments.contains_key(&key) {
                tracing::warn!(instrument = %key, "Already being watched");
                report.already_watched.push(key);
                continue;
            }
            self.instruments.insert(key.clone(), InstrumentState::default());
            report.added.push(key);
        }
        self.ensure_defaults();
        Ok(report)
    }

    /// Record a fresh price and extend each scale's curvature history.
    ///
    /// Unknown instruments are created lazily, so an implicit first
    /// observation starts a history.
    pub fn ingest(&mut self, key: &InstrumentKey, price: f64) {
        let state = self.instruments.entry(key.clone()).or_default();
        state.prices.push(price);
        for (scale, series) in state.series.iter_mut().enumerate() {
            let resampled = state.prices.resample(stride(scale));
            series.push(curvature(&resampled));
        }
    }

    /// Run the threshold update for every scale of one instrument and
    /// return the scales whose latest defined curvature magnitude
    /// exceeds the (possibly just-updated) bound.
    pub fn evaluate(&mut self, key: &InstrumentKey) -> Vec<usize> {
        let nsd = self.nsd;
        let Some(state) = self.instruments.get_mut(key) else {
            return Vec::new();
        };
        let mut triggered = Vec::new();
        for scale in 0..SCALES {
            state.thresholds[scale].update(&state.series[scale], nsd);
            if let Some(curv) = state.series[scale].latest() {
                if state.thresholds[scale].bound.exceeded_by(curv) {
                    triggered.push(scale);
                }
            }
        }
        triggered
    }

    /// Report the latest price and per-scale normalized curvature
    /// (curvature divided by its bound).
    ///
    /// `keys = None` covers the whole watchlist. Instruments with no
    /// recorded prices are omitted. A normalized value is `None` while
    /// the curvature is undefined or the bound is uncalibrated or zero.
    #[must_use]
    pub fn snapshot(&self, keys: Option<&[InstrumentKey]>) -> WatchReport {
        let selected: Vec<&InstrumentKey> = match keys {
            Some(keys) => keys.iter().collect(),
            None => self.instruments.keys().collect(),
        };
        let mut report = WatchReport::default();
        for key in selected {
            let Some(state) = self.instruments.get(key) else {
                continue;
            };
            let Some(last_price) = state.prices.latest() else {
                continue;
            };
            let mut normalized = [None; SCALES];
            for scale in 0..SCALES {
                normalized[scale] = match (
                    state.series[scale].latest(),
                    state.thresholds[scale].bound.value(),
                ) {
                    (Some(curv), Some(bound)) if bound != 0.0 => Some(curv / bound),
                    _ => None,
                };
            }
            report.entries.insert(
                key.clone(),
                SnapshotEntry {
                    last_price,
                    normalized,
                },
            );
        }
        report
    }

    /// Price window oldest-first as returns relative to the latest
    /// price (`p / latest - 1`), for charting.
    ///
    /// # Errors
    /// [`WatchError::NotWatched`] for unknown instruments and
    /// [`WatchError::EmptySeries`] when the window is empty or the
    /// latest price is non-positive.
    pub fn relative_series(&self, key: &InstrumentKey) -> Result<Vec<f64>, WatchError> {
        let state = self
            .instruments
            .get(key)
            .ok_or_else(|| WatchError::NotWatched {
                instrument: key.to_string(),
            })?;
        let latest = state
            .prices
            .latest()
            .filter(|price| *price > 0.0)
            .ok_or_else(|| WatchError::EmptySeries {
                instrument: key.to_string(),
            })?;
        Ok(state
            .prices
            .oldest_first()
            .iter()
            .map(|price| price / latest - 1.0)
            .collect())
    }

    /// Latest curvature for one scale, if defined.
    #[must_use]
    pub fn latest_curvature(&self, key: &InstrumentKey, scale: usize) -> Option<f64> {
        self.instruments.get(key)?.series.get(scale)?.latest()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    #[must_use]
    pub fn contains(&self, key: &InstrumentKey) -> bool {
        self.instruments.contains_key(key)
    }

    /// The watched instruments, for partitioning a quote fetch.
    #[must_use]
    pub fn keys(&self) -> Vec<InstrumentKey> {
        self.instruments.keys().cloned().collect()
    }
}
