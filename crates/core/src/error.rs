//! Error taxonomy for the watch engine.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failures the engine surfaces to the user.
///
/// Transient insufficiency of data is deliberately not represented here:
/// an undefined curvature is `None` and an immature threshold is the
/// uncalibrated bound variant. Both are normal states while history
/// accumulates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WatchError {
    /// Relative-series request against an instrument with no usable history.
    #[error("no data for {instrument}")]
    EmptySeries { instrument: String },

    /// Series request for an instrument that is not being watched.
    #[error("{instrument} is not being watched")]
    NotWatched { instrument: String },

    /// A stop monitor already exists for this exact (position, price) pair.
    /// The running monitor is unaffected.
    #[error("stop order for position {position_id} already set up at {limit_price}")]
    DuplicateStop {
        position_id: String,
        limit_price: Decimal,
    },

    /// The instrument spec could not be parsed as a ticker or option.
    #[error("unrecognized instrument spec: {input:?}")]
    BadInstrument { input: String },
}
