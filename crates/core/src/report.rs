//! Snapshot report delivered to the display collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::instrument::InstrumentKey;

/// Number of resampling scales tracked per instrument.
pub const SCALES: usize = 3;

/// Latest raw price plus per-scale curvature normalized by its bound.
///
/// A normalized value is `None` while that scale's curvature is undefined
/// or its bound is still uncalibrated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub last_price: f64,
    pub normalized: [Option<f64>; SCALES],
}

/// Ordered per-instrument snapshot.
///
/// Built either from a detector tick's flagged list — which names an
/// instrument once per triggering scale — or from a manual request. The
/// keyed map collapses any repeats.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WatchReport {
    pub entries: BTreeMap<InstrumentKey, SnapshotEntry>,
}

impl WatchReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
