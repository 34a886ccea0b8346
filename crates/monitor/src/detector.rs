//! Anomaly detector — the periodic poller that feeds the watch registry
//! and raises curvature flags.
//!
//! One actor task owns the registry outright. Ticks and commands
//! interleave on that task, so every mutation is serialized without
//! locks, and a failed quote batch only costs the affected instruments
//! one tick.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::prelude::ToPrimitive;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use tapewatch_core::{AppConfig, InstrumentKey, NotificationSink, OptionContract, QuoteSource};
use tapewatch_signals::WatchRegistry;

use crate::commands::WatchCommand;
use crate::handle::WatchHandle;

pub struct DetectorActor {
    registry: WatchRegistry,
    quotes: Arc<dyn QuoteSource>,
    notifier: Arc<dyn NotificationSink>,
    period: Duration,
    rx: mpsc::Receiver<WatchCommand>,
}

impl DetectorActor {
    #[must_use]
    pub fn new(
        registry: WatchRegistry,
        quotes: Arc<dyn QuoteSource>,
        notifier: Arc<dyn NotificationSink>,
        period: Duration,
        rx: mpsc::Receiver<WatchCommand>,
    ) -> Self {
        Self {
            registry,
            quotes,
            notifier,
            period,
            rx,
        }
    }

    /// Run the poll loop until a shutdown command arrives or every
    /// handle is dropped. Each sleep boundary doubles as the
    /// cancellation point.
    pub async fn run(mut self) {
        let start = tokio::time::Instant::now() + self.period;
        let mut interval = tokio::time::interval_at(start, self.period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = interval.tick() => self.poll_tick().await,
                cmd = self.rx.recv() => match cmd {
                    Some(WatchCommand::Watch { specs, respond_to }) => {
                        let _ = respond_to.send(self.registry.add(&specs));
                    }
                    Some(WatchCommand::Snapshot { respond_to }) => {
                        let _ = respond_to.send(self.registry.snapshot(None));
                    }
                    Some(WatchCommand::RelativeSeries { key, respond_to }) => {
                        let _ = respond_to.send(self.registry.relative_series(&key));
                    }
                    Some(WatchCommand::Shutdown) | None => break,
                },
            }
        }
        debug!("Detector actor stopped");
    }

    /// One detection pass: refresh quotes, ingest everything, then
    /// evaluate everything, then report.
    async fn poll_tick(&mut self) {
        if self.registry.is_empty() {
            return;
        }

        let mut stocks: Vec<String> = Vec::new();
        let mut options: Vec<OptionContract> = Vec::new();
        for key in self.registry.keys() {
            match key {
                InstrumentKey::Stock(symbol) => stocks.push(symbol),
                InstrumentKey::Option(contract) => options.push(contract),
            }
        }

        // A failed batch drops its instruments from this tick only; the
        // other batch and the loop itself carry on.
        let mut fresh: Vec<(InstrumentKey, f64)> = Vec::new();
        if !stocks.is_empty() {
            match self.quotes.stock_quotes(&stocks).await {
                Ok(quotes) => {
                    for (symbol, last) in quotes {
                        if let Some(price) = last.to_f64() {
                            fresh.push((InstrumentKey::Stock(symbol), price));
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, count = stocks.len(), "Stock quote batch failed");
                    self.notifier
                        .message(&format!("stock quote refresh failed: {e}"))
                        .await;
                }
            }
        }
        if !options.is_empty() {
            match self.quotes.option_quotes(&options).await {
                Ok(quotes) => {
                    for (last, contract) in quotes {
                        if let Some(price) = last.to_f64() {
                            fresh.push((InstrumentKey::Option(contract), price));
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, count = options.len(), "Option quote batch failed");
                    self.notifier
                        .message(&format!("option quote refresh failed: {e}"))
                        .await;
                }
            }
        }

        // Ingest every fresh price before evaluating any threshold.
        for (key, price) in &fresh {
            self.registry.ingest(key, *price);
        }

        // The flagged list repeats an instrument once per triggering
        // scale; the keyed snapshot below collapses the repeats.
        let mut flagged: Vec<InstrumentKey> = Vec::new();
        for (key, _) in &fresh {
            for _scale in self.registry.evaluate(key) {
                flagged.push(key.clone());
            }
        }

        if !flagged.is_empty() {
            info!(count = flagged.len(), "Curvature anomaly flagged");
            self.notifier.bell().await;
            let report = self.registry.snapshot(Some(&flagged));
            self.notifier.report(report).await;
        }
    }
}

/// Spawn the detector on its own task and hand back the command handle.
#[must_use]
pub fn spawn_detector(
    registry: WatchRegistry,
    quotes: Arc<dyn QuoteSource>,
    notifier: Arc<dyn NotificationSink>,
    config: &AppConfig,
) -> (WatchHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(32);
    let actor = DetectorActor::new(
        registry,
        quotes,
        notifier,
        Duration::from_secs(config.detect_interval_secs),
        rx,
    );
    let task = tokio::spawn(actor.run());
    (WatchHandle::new(tx), task)
}
