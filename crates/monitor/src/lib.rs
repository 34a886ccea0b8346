//! Background monitoring — the anomaly detector actor and the
//! stop-order monitors. Everything here runs on its own tokio task and
//! talks to the brokerage and the terminal through the collaborator
//! traits in `tapewatch-core`.

pub mod commands;
pub mod detector;
pub mod handle;
pub mod stops;

pub use commands::WatchCommand;
pub use detector::{spawn_detector, DetectorActor};
pub use handle::WatchHandle;
pub use stops::{StopKey, StopRegistry, StopTiming};
