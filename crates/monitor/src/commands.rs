//! Commands accepted by the detector actor.

use tokio::sync::oneshot;

use tapewatch_core::{InstrumentKey, WatchError, WatchReport};
use tapewatch_signals::AddReport;

/// Messages other tasks send to the detector actor. The actor is the
/// only writer over the watch registry; these are the read-side doors.
#[derive(Debug)]
pub enum WatchCommand {
    /// Start watching instrument specs.
    Watch {
        specs: Vec<String>,
        respond_to: oneshot::Sender<Result<AddReport, WatchError>>,
    },
    /// Manual full-watchlist snapshot, not gated by anomaly detection.
    Snapshot {
        respond_to: oneshot::Sender<WatchReport>,
    },
    /// Oldest-first normalized return series for charting.
    RelativeSeries {
        key: InstrumentKey,
        respond_to: oneshot::Sender<Result<Vec<f64>, WatchError>>,
    },
    /// Stop the actor at the next loop boundary.
    Shutdown,
}
