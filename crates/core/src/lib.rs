pub mod config;
pub mod config_loader;
pub mod error;
pub mod instrument;
pub mod quotes;
pub mod report;
pub mod traits;

pub use config::AppConfig;
pub use config_loader::ConfigLoader;
pub use error::WatchError;
pub use instrument::{InstrumentKey, OptionContract, OptionRight};
pub use quotes::{PendingQuantities, PositionQuote};
pub use report::{SnapshotEntry, WatchReport, SCALES};
pub use traits::{NotificationSink, OrderSink, QuoteSource};
