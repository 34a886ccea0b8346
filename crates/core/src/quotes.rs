//! Quote and position snapshots exchanged with the brokerage collaborator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bid/ask snapshot for a held position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionQuote {
    /// Price the position was opened at.
    pub original_price: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
}

/// Outstanding order quantities for a position.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PendingQuantities {
    pub pending_buy: i64,
    pub pending_sell: i64,
}

impl PendingQuantities {
    /// Total quantity still resting on the book.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.pending_buy + self.pending_sell
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_total_sums_both_sides() {
        let pending = PendingQuantities {
            pending_buy: 2,
            pending_sell: 3,
        };
        assert_eq!(pending.total(), 5);
        assert_eq!(PendingQuantities::default().total(), 0);
    }
}
