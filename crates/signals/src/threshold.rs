//! Adaptive per-scale trigger bound with recalibration hysteresis.

use crate::series::ScaleSeries;

/// Defined samples required before a bound is statistically meaningful.
pub const MIN_VALID_SAMPLES: usize = 24;

/// Ticks the bound is held fixed once the history saturates.
pub const HOLD_TICKS: u32 = 11;

/// Trigger bound for one instrument at one scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Not enough history yet; nothing exceeds it.
    Uncalibrated,
    /// `nsd * stdev` of the defined curvature samples.
    Calibrated(f64),
}

impl Bound {
    /// Whether a defined curvature magnitude breaches this bound.
    #[must_use]
    pub fn exceeded_by(&self, curvature: f64) -> bool {
        match self {
            Self::Uncalibrated => false,
            Self::Calibrated(bound) => curvature.abs() > *bound,
        }
    }

    /// The numeric bound, if calibrated.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Uncalibrated => None,
            Self::Calibrated(bound) => Some(*bound),
        }
    }
}

/// Bound plus the hold counter that drives recalibration.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdState {
    pub bound: Bound,
    /// Ticks the current bound has been held since the history saturated.
    pub stable_ticks: u32,
}

impl Default for ThresholdState {
    fn default() -> Self {
        Self {
            bound: Bound::Uncalibrated,
            stable_ticks: 0,
        }
    }
}

impl ThresholdState {
    /// Advance the bound for one tick of curvature history.
    ///
    /// Below [`MIN_VALID_SAMPLES`] defined values the bound stays
    /// uncalibrated. While the history is still filling, the bound is
    /// recomputed every tick. Once the history saturates, the bound is
    /// held for [`HOLD_TICKS`] ticks, then recalibrated with the counter
    /// reset.
    pub fn update(&mut self, series: &ScaleSeries, nsd: f64) {
        let valid = series.valid();
        if valid.len() < MIN_VALID_SAMPLES {
            self.bound = Bound::Uncalibrated;
            return;
        }
        if !series.is_full() {
            self.bound = Bound::Calibrated(nsd * stdev(&valid));
            return;
        }
        if self.stable_ticks < HOLD_TICKS {
            self.stable_ticks += 1;
            return;
        }
        self.bound = Bound::Calibrated(nsd * stdev(&valid));
        self.stable_ticks = 0;
    }
}

/// Sample standard deviation (n - 1 denominator).
fn stdev(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}
