//! Collaborator contracts — quotes in, orders and notifications out.
//!
//! The engine never talks to the brokerage or the terminal directly.
//! The shell layer supplies these implementations; their network
//! sessions are expected to be safe to share across tasks.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::instrument::OptionContract;
use crate::quotes::{PendingQuantities, PositionQuote};
use crate::report::WatchReport;

/// Read side of the brokerage API.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Last trade price per stock symbol. Symbols with no quote available
    /// are simply absent from the map.
    async fn stock_quotes(&self, symbols: &[String]) -> Result<HashMap<String, Decimal>>;

    /// Last trade price per option contract.
    async fn option_quotes(
        &self,
        contracts: &[OptionContract],
    ) -> Result<Vec<(Decimal, OptionContract)>>;

    /// Current bid/ask for a held position.
    async fn position_quote(&self, position_id: &str) -> Result<PositionQuote>;

    /// Outstanding order quantities for a position.
    async fn position_pending(&self, position_id: &str) -> Result<PendingQuantities>;
}

/// Order command relay to the shell collaborator.
///
/// Fire-and-forget: `Ok` acknowledges the command was accepted for
/// dispatch, not that anything executed.
#[async_trait]
pub trait OrderSink: Send + Sync {
    /// Request closing a position with a sell at `limit_price`.
    async fn close_position(&self, position_id: &str, limit_price: Decimal) -> Result<()>;

    /// Request cancellation of every open order for a position.
    async fn cancel_position_orders(&self, position_id: &str) -> Result<()>;
}

/// Alerting and display sink.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Audible alert.
    async fn bell(&self);

    /// Deliver a snapshot report for display.
    async fn report(&self, report: WatchReport);

    /// Plain user-facing notice (skipped-tick failures and the like).
    async fn message(&self, text: &str);
}
