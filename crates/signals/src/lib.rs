pub mod curvature;
pub mod registry;
pub mod series;
pub mod threshold;

pub use curvature::{curvature, first_diff};
pub use registry::{AddReport, InstrumentState, WatchRegistry};
pub use series::{stride, PriceWindow, ScaleSeries, PRICE_CAPACITY, SERIES_CAPACITY};
pub use threshold::{Bound, ThresholdState, HOLD_TICKS, MIN_VALID_SAMPLES};
