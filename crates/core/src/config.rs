//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the detector and the stop monitors.
///
/// The legacy short option names `MT`, `DMT`, `NSD`, and `WATCH` are
/// accepted as aliases in config files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Stop monitor poll interval while armed, seconds.
    #[serde(alias = "MT", default = "default_stop_poll")]
    pub stop_poll_secs: u64,

    /// Anomaly detector tick period, seconds.
    #[serde(alias = "DMT", default = "default_detect_interval")]
    pub detect_interval_secs: u64,

    /// Threshold stdev multiplier; larger means less sensitive.
    #[serde(alias = "NSD", default = "default_stdev_multiplier")]
    pub stdev_multiplier: f64,

    /// Space-delimited default watchlist, merged in at startup and on
    /// every watch command.
    #[serde(alias = "WATCH", default)]
    pub watchlist: String,

    /// Repricing poll interval for a triggered stop, seconds.
    #[serde(default = "default_reprice_interval")]
    pub reprice_interval_secs: u64,

    /// Pause between cancelling and resubmitting a stop sell, seconds.
    #[serde(default = "default_resubmit_delay")]
    pub resubmit_delay_secs: u64,
}

const fn default_stop_poll() -> u64 {
    30
}

const fn default_detect_interval() -> u64 {
    5
}

const fn default_stdev_multiplier() -> f64 {
    2.0
}

const fn default_reprice_interval() -> u64 {
    5
}

const fn default_resubmit_delay() -> u64 {
    3
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stop_poll_secs: default_stop_poll(),
            detect_interval_secs: default_detect_interval(),
            stdev_multiplier: default_stdev_multiplier(),
            watchlist: String::new(),
            reprice_interval_secs: default_reprice_interval(),
            resubmit_delay_secs: default_resubmit_delay(),
        }
    }
}
