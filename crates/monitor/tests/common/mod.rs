//! Scripted collaborator doubles shared by the integration tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;

use tapewatch_core::{
    NotificationSink, OptionContract, OrderSink, PendingQuantities, PositionQuote, QuoteSource,
    WatchReport,
};

/// Quote source that replays pre-scripted series.
///
/// Stock quotes pop one entry per symbol per call; an exhausted series
/// simply stops quoting that symbol. Bid and pending series keep
/// repeating their final entry so a monitor can poll past the script.
#[derive(Default)]
pub struct ScriptedQuotes {
    pub stock_series: Mutex<HashMap<String, VecDeque<Decimal>>>,
    pub bid_series: Mutex<VecDeque<Decimal>>,
    pub pending_series: Mutex<VecDeque<(i64, i64)>>,
    pub fail_stocks: AtomicBool,
}

impl ScriptedQuotes {
    pub fn with_stock(symbol: &str, quotes: impl IntoIterator<Item = Decimal>) -> Self {
        let source = Self::default();
        source
            .stock_series
            .lock()
            .unwrap()
            .insert(symbol.to_string(), quotes.into_iter().collect());
        source
    }

    pub fn with_position(
        bids: impl IntoIterator<Item = Decimal>,
        pending: impl IntoIterator<Item = (i64, i64)>,
    ) -> Self {
        let source = Self::default();
        *source.bid_series.lock().unwrap() = bids.into_iter().collect();
        *source.pending_series.lock().unwrap() = pending.into_iter().collect();
        source
    }
}

fn pop_repeating_last<T: Copy>(series: &mut VecDeque<T>) -> Option<T> {
    if series.len() > 1 {
        series.pop_front()
    } else {
        series.front().copied()
    }
}

#[async_trait]
impl QuoteSource for ScriptedQuotes {
    async fn stock_quotes(&self, symbols: &[String]) -> Result<HashMap<String, Decimal>> {
        if self.fail_stocks.load(Ordering::SeqCst) {
            bail!("scripted outage");
        }
        let mut series = self.stock_series.lock().unwrap();
        let mut quotes = HashMap::new();
        for symbol in symbols {
            if let Some(last) = series.get_mut(symbol).and_then(VecDeque::pop_front) {
                quotes.insert(symbol.clone(), last);
            }
        }
        Ok(quotes)
    }

    async fn option_quotes(
        &self,
        _contracts: &[OptionContract],
    ) -> Result<Vec<(Decimal, OptionContract)>> {
        Ok(Vec::new())
    }

    async fn position_quote(&self, _position_id: &str) -> Result<PositionQuote> {
        let bid = pop_repeating_last(&mut self.bid_series.lock().unwrap())
            .context("no scripted bid")?;
        Ok(PositionQuote {
            original_price: bid,
            bid,
            ask: bid,
        })
    }

    async fn position_pending(&self, _position_id: &str) -> Result<PendingQuantities> {
        let (pending_buy, pending_sell) =
            pop_repeating_last(&mut self.pending_series.lock().unwrap())
                .context("no scripted pending quantities")?;
        Ok(PendingQuantities {
            pending_buy,
            pending_sell,
        })
    }
}

/// Order sink that records every command it is asked to relay.
#[derive(Default)]
pub struct RecordingOrders {
    commands: Mutex<Vec<String>>,
}

impl RecordingOrders {
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderSink for RecordingOrders {
    async fn close_position(&self, position_id: &str, limit_price: Decimal) -> Result<()> {
        self.commands
            .lock()
            .unwrap()
            .push(format!("close {position_id} @ {limit_price}"));
        Ok(())
    }

    async fn cancel_position_orders(&self, position_id: &str) -> Result<()> {
        self.commands
            .lock()
            .unwrap()
            .push(format!("cancel {position_id}"));
        Ok(())
    }
}

/// Notification sink that counts bells and keeps reports and messages.
#[derive(Default)]
pub struct RecordingNotifier {
    pub bells: AtomicUsize,
    reports: Mutex<Vec<WatchReport>>,
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn bell_count(&self) -> usize {
        self.bells.load(Ordering::SeqCst)
    }

    pub fn reports(&self) -> Vec<WatchReport> {
        self.reports.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn bell(&self) {
        self.bells.fetch_add(1, Ordering::SeqCst);
    }

    async fn report(&self, report: WatchReport) {
        self.reports.lock().unwrap().push(report);
    }

    async fn message(&self, text: &str) {
        self.messages.lock().unwrap().push(text.to_string());
    }
}
