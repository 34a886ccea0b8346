//! Self-repricing stop-loss monitors, one background task per
//! (position, limit price).
//!
//! A monitor arms against the position's bid, fires a single sell at the
//! limit, then cancels and resubmits at the current bid until nothing is
//! left resting. Repricing assumes option fill mechanics; equity
//! positions are not reliably repriced — a longstanding limitation kept
//! as-is rather than guessed around.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use tapewatch_core::{AppConfig, NotificationSink, OrderSink, QuoteSource, WatchError};

/// Key for one stop monitor. A position may carry monitors at several
/// distinct prices, never two at the same price.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StopKey {
    pub position_id: String,
    pub limit_price: Decimal,
}

/// Monitor lifecycle. Transitions are strictly sequential within one
/// monitor; `Done` ends the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopState {
    Armed,
    Triggered,
    Repricing,
    Done,
}

/// Timing knobs for the monitor loops.
#[derive(Debug, Clone, Copy)]
pub struct StopTiming {
    /// Bid poll interval while armed.
    pub poll: Duration,
    /// Pending-quantity poll interval while repricing.
    pub reprice: Duration,
    /// Gap between cancelling and resubmitting the sell.
    pub resubmit_delay: Duration,
}

impl StopTiming {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            poll: Duration::from_secs(config.stop_poll_secs),
            reprice: Duration::from_secs(config.reprice_interval_secs),
            resubmit_delay: Duration::from_secs(config.resubmit_delay_secs),
        }
    }
}

struct StopMonitor {
    key: StopKey,
    quotes: Arc<dyn QuoteSource>,
    orders: Arc<dyn OrderSink>,
    notifier: Arc<dyn NotificationSink>,
    timing: StopTiming,
}

impl StopMonitor {
    /// Drive the state machine until the position has nothing pending
    /// or shutdown is signalled. Every sleep is a cancellation point.
    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut state = StopState::Armed;
        loop {
            state = match state {
                StopState::Armed => {
                    if !self.sleep_or_shutdown(self.timing.poll, &mut shutdown).await {
                        return;
                    }
                    match self.quotes.position_quote(&self.key.position_id).await {
                        Ok(quote) if quote.bid < self.key.limit_price => StopState::Triggered,
                        Ok(_) => StopState::Armed,
                        Err(e) => {
                            warn!(
                                position = %self.key.position_id,
                                error = %e,
                                "Stop poll failed; staying armed"
                            );
                            StopState::Armed
                        }
                    }
                }
                StopState::Triggered => {
                    info!(
                        position = %self.key.position_id,
                        limit = %self.key.limit_price,
                        "Executing stop order"
                    );
                    self.notifier.bell().await;
                    if let Err(e) = self
                        .orders
                        .close_position(&self.key.position_id, self.key.limit_price)
                        .await
                    {
                        warn!(position = %self.key.position_id, error = %e, "Stop sell command failed");
                    }
                    StopState::Repricing
                }
                StopState::Repricing => {
                    if !self
                        .sleep_or_shutdown(self.timing.reprice, &mut shutdown)
                        .await
                    {
                        return;
                    }
                    match self.quotes.position_pending(&self.key.position_id).await {
                        Ok(pending) if pending.total() == 0 => StopState::Done,
                        Ok(_) => {
                            if !self.reprice(&mut shutdown).await {
                                return;
                            }
                            StopState::Repricing
                        }
                        Err(e) => {
                            warn!(
                                position = %self.key.position_id,
                                error = %e,
                                "Pending quantity fetch failed; retrying"
                            );
                            StopState::Repricing
                        }
                    }
                }
                StopState::Done => {
                    debug!(position = %self.key.position_id, "Stop order filled; monitor finished");
                    return;
                }
            };
        }
    }

    /// One cancel-and-resubmit pass at the current bid. Returns `false`
    /// if shutdown arrived mid-pass.
    async fn reprice(&self, shutdown: &mut watch::Receiver<bool>) -> bool {
        self.notifier
            .message(&format!("repricing stop order for {}", self.key.position_id))
            .await;
        if let Err(e) = self
            .orders
            .cancel_position_orders(&self.key.position_id)
            .await
        {
            warn!(position = %self.key.position_id, error = %e, "Cancel command failed");
        }
        if !self
            .sleep_or_shutdown(self.timing.resubmit_delay, shutdown)
            .await
        {
            return false;
        }
        match self.quotes.position_quote(&self.key.position_id).await {
            Ok(quote) => {
                if let Err(e) = self
                    .orders
                    .close_position(&self.key.position_id, quote.bid)
                    .await
                {
                    warn!(position = %self.key.position_id, error = %e, "Resubmit command failed");
                }
            }
            Err(e) => {
                warn!(position = %self.key.position_id, error = %e, "Bid refresh failed; resubmit skipped");
            }
        }
        true
    }

    /// Sleep for `dur`, returning `false` if shutdown wins the race.
    async fn sleep_or_shutdown(&self, dur: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
        tokio::select! {
            () = tokio::time::sleep(dur) => true,
            _ = shutdown.changed() => false,
        }
    }
}

struct StopTask {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Registry of stop monitors. Keys are never reused: a monitor that has
/// finished still occupies its (position, price) slot for the life of
/// the process.
pub struct StopRegistry {
    stops: HashMap<StopKey, StopTask>,
    quotes: Arc<dyn QuoteSource>,
    orders: Arc<dyn OrderSink>,
    notifier: Arc<dyn NotificationSink>,
    timing: StopTiming,
}

impl StopRegistry {
    #[must_use]
    pub fn new(
        quotes: Arc<dyn QuoteSource>,
        orders: Arc<dyn OrderSink>,
        notifier: Arc<dyn NotificationSink>,
        config: &AppConfig,
    ) -> Self {
        Self {
            stops: HashMap::new(),
            quotes,
            orders,
            notifier,
            timing: StopTiming::from_config(config),
        }
    }

    /// Register and start a stop monitor for `(position_id, limit_price)`.
    ///
    /// The same position may be registered again at a different price as
    /// an independent monitor.
    ///
    /// # Errors
    /// Returns [`WatchError::DuplicateStop`] for a repeat registration
    /// at the same price; the running monitor is untouched and no second
    /// task starts.
    pub fn register(&mut self, position_id: &str, limit_price: Decimal) -> Result<(), WatchError> {
        let key = StopKey {
            position_id: position_id.to_string(),
            limit_price,
        };
        if self.stops.contains_key(&key) {
            warn!(
                position = %key.position_id,
                limit = %key.limit_price,
                "Stop order already set up at this price"
            );
            return Err(WatchError::DuplicateStop {
                position_id: key.position_id,
                limit_price,
            });
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let monitor = StopMonitor {
            key: key.clone(),
            quotes: Arc::clone(&self.quotes),
            orders: Arc::clone(&self.orders),
            notifier: Arc::clone(&self.notifier),
            timing: self.timing,
        };
        let task = tokio::spawn(monitor.run(shutdown_rx));
        info!(position = %key.position_id, limit = %key.limit_price, "Stop monitor armed");
        self.stops.insert(
            key,
            StopTask {
                shutdown: shutdown_tx,
                task,
            },
        );
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    #[must_use]
    pub fn contains(&self, position_id: &str, limit_price: Decimal) -> bool {
        self.stops.contains_key(&StopKey {
            position_id: position_id.to_string(),
            limit_price,
        })
    }

    /// Monitors whose task is still running.
    #[must_use]
    pub fn active(&self) -> usize {
        self.stops.values().filter(|stop| !stop.task.is_finished()).count()
    }

    /// Signal every monitor to stop and wait for the tasks to end.
    pub async fn shutdown_all(&mut self) {
        for stop in self.stops.values() {
            let _ = stop.shutdown.send(true);
        }
        for (_, stop) in self.stops.drain() {
            let _ = stop.task.await;
        }
    }
}
