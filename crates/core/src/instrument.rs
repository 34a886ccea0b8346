//! Instrument identity — stock tickers and option contracts.
//!
//! Options use the canonical `SYMBOL C|P STRIKE YYYY-MM-DD` form the
//! brokerage's instrument records rebuild to, so a key round-trips
//! through its display string.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::WatchError;

/// Option right (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionRight {
    Call,
    Put,
}

impl fmt::Display for OptionRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => write!(f, "C"),
            Self::Put => write!(f, "P"),
        }
    }
}

impl FromStr for OptionRight {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "C" | "CALL" => Ok(Self::Call),
            "P" | "PUT" => Ok(Self::Put),
            _ => Err(WatchError::BadInstrument {
                input: s.to_string(),
            }),
        }
    }
}

/// An options contract identified by underlying, right, strike, and expiry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OptionContract {
    pub symbol: String,
    pub right: OptionRight,
    pub strike: Decimal,
    pub expiry: NaiveDate,
}

impl fmt::Display for OptionContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.2} {}",
            self.symbol, self.right, self.strike, self.expiry
        )
    }
}

/// A watched instrument — a plain stock ticker or an option contract.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InstrumentKey {
    Stock(String),
    Option(OptionContract),
}

impl InstrumentKey {
    /// Parse an instrument spec.
    ///
    /// A lone token is a stock ticker; the 4-token form
    /// `SYMBOL C|P STRIKE YYYY-MM-DD` is an option. Symbols are
    /// uppercase-normalized either way.
    ///
    /// # Errors
    /// Returns [`WatchError::BadInstrument`] for any other shape.
    pub fn parse(spec: &str) -> Result<Self, WatchError> {
        let bad = || WatchError::BadInstrument {
            input: spec.to_string(),
        };
        let tokens: Vec<&str> = spec.split_whitespace().collect();
        match tokens.as_slice() {
            [symbol] => Ok(Self::Stock(symbol.to_uppercase())),
            [symbol, right, strike, expiry] => {
                let right = right.parse()?;
                let strike = Decimal::from_str(strike).map_err(|_| bad())?;
                let expiry = NaiveDate::parse_from_str(expiry, "%Y-%m-%d").map_err(|_| bad())?;
                Ok(Self::Option(OptionContract {
                    symbol: symbol.to_uppercase(),
                    right,
                    strike,
                    expiry,
                }))
            }
            _ => Err(bad()),
        }
    }

    /// The underlying symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        match self {
            Self::Stock(symbol) => symbol,
            Self::Option(contract) => &contract.symbol,
        }
    }
}

impl fmt::Display for InstrumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stock(symbol) => write!(f, "{symbol}"),
            Self::Option(contract) => write!(f, "{contract}"),
        }
    }
}

impl FromStr for InstrumentKey {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Keys serialize as their canonical string so reports are plain
// string-keyed maps on the wire.
impl Serialize for InstrumentKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InstrumentKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let spec = String::deserialize(deserializer)?;
        Self::parse(&spec).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn stock_spec_is_uppercased() {
        let key = InstrumentKey::parse("aapl").unwrap();
        assert_eq!(key, InstrumentKey::Stock("AAPL".to_string()));
        assert_eq!(key.to_string(), "AAPL");
    }

    #[test]
    fn option_spec_round_trips_through_display() {
        let key = InstrumentKey::parse("nvda C 140.00 2026-03-20").unwrap();
        let InstrumentKey::Option(ref contract) = key else {
            panic!("expected an option key");
        };
        assert_eq!(contract.symbol, "NVDA");
        assert_eq!(contract.right, OptionRight::Call);
        assert_eq!(contract.strike, dec!(140));
        assert_eq!(key.to_string(), "NVDA C 140.00 2026-03-20");
        assert_eq!(InstrumentKey::parse(&key.to_string()).unwrap(), key);
    }

    #[test]
    fn strike_display_is_two_decimal_places() {
        let key = InstrumentKey::parse("SPY p 432.5 2026-01-16").unwrap();
        assert_eq!(key.to_string(), "SPY P 432.50 2026-01-16");
    }

    #[test]
    fn equal_strikes_with_different_scales_are_one_key() {
        let a = InstrumentKey::parse("SPY P 432.5 2026-01-16").unwrap();
        let b = InstrumentKey::parse("SPY P 432.50 2026-01-16").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_specs_are_rejected() {
        for spec in ["", "AAPL C", "AAPL X 140.00 2026-03-20", "AAPL C x 2026-03-20", "AAPL C 140.00 03/20/2026"] {
            assert!(
                matches!(InstrumentKey::parse(spec), Err(WatchError::BadInstrument { .. })),
                "spec {spec:?} should be rejected"
            );
        }
    }

    #[test]
    fn keys_serialize_as_canonical_strings() {
        let stock = InstrumentKey::parse("AAPL").unwrap();
        assert_eq!(serde_json::to_string(&stock).unwrap(), "\"AAPL\"");

        let option = InstrumentKey::parse("NVDA C 140.00 2026-03-20").unwrap();
        let json = serde_json::to_string(&option).unwrap();
        assert_eq!(json, "\"NVDA C 140.00 2026-03-20\"");
        assert_eq!(serde_json::from_str::<InstrumentKey>(&json).unwrap(), option);
    }
}
