//! Bounded newest-first windows for raw prices and per-scale curvature
//! history. Oldest entries are evicted once a window is at capacity.

use std::collections::VecDeque;

/// Raw price window capacity.
pub const PRICE_CAPACITY: usize = 61;

/// Curvature history capacity per scale.
pub const SERIES_CAPACITY: usize = 180;

/// Resampling stride for scale `b`: 1, 4, 11.
#[must_use]
pub const fn stride(scale: usize) -> usize {
    (5 * scale * scale + scale + 2) / 2
}

/// Most recent raw prices for one instrument, newest first.
#[derive(Debug, Clone, Default)]
pub struct PriceWindow {
    prices: VecDeque<f64>,
}

impl PriceWindow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            prices: VecDeque::with_capacity(PRICE_CAPACITY),
        }
    }

    /// Push the freshest price, evicting the oldest beyond capacity.
    pub fn push(&mut self, price: f64) {
        self.prices.push_front(price);
        self.prices.truncate(PRICE_CAPACITY);
    }

    #[must_use]
    pub fn latest(&self) -> Option<f64> {
        self.prices.front().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Every `stride`-th price, newest first.
    #[must_use]
    pub fn resample(&self, stride: usize) -> Vec<f64> {
        self.prices.iter().step_by(stride).copied().collect()
    }

    /// Oldest-first copy of the window.
    #[must_use]
    pub fn oldest_first(&self) -> Vec<f64> {
        self.prices.iter().rev().copied().collect()
    }
}

/// Curvature history for one instrument at one scale, newest first.
/// Entries are `None` while the resampled window was too short.
#[derive(Debug, Clone, Default)]
pub struct ScaleSeries {
    values: VecDeque<Option<f64>>,
}

impl ScaleSeries {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: VecDeque::with_capacity(SERIES_CAPACITY),
        }
    }

    /// Push the freshest curvature, evicting the oldest beyond capacity.
    pub fn push(&mut self, value: Option<f64>) {
        self.values.push_front(value);
        self.values.truncate(SERIES_CAPACITY);
    }

    /// The newest entry, if it is a defined curvature.
    #[must_use]
    pub fn latest(&self) -> Option<f64> {
        self.values.front().copied().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the history has reached capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.values.len() == SERIES_CAPACITY
    }

    /// The defined curvature values, newest first.
    #[must_use]
    pub fn valid(&self) -> Vec<f64> {
        self.values.iter().filter_map(|v| *v).collect()
    }
}
