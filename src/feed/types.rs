//! Price feed types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

use crate::oracle::OracleError;

/// Decimal precision reported for computed cross rates
pub const DERIVED_DECIMALS: u32 = 18;

/// Supported price symbols
///
/// Serialized as the pair name (`"BTC/USD"`), including as a map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    BtcUsd,
    EthUsd,
    BnbUsd,
    BtcEth,
    BnbEth,
}

impl Symbol {
    /// Every supported symbol, in canonical fetch order
    pub const ALL: [Symbol; 5] = [
        Symbol::BtcUsd,
        Symbol::EthUsd,
        Symbol::BnbUsd,
        Symbol::BtcEth,
        Symbol::BnbEth,
    ];

    /// Symbols backed by a single oracle contract
    pub const DIRECT: [Symbol; 3] = [Symbol::BtcUsd, Symbol::EthUsd, Symbol::BnbUsd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::BtcUsd => "BTC/USD",
            Symbol::EthUsd => "ETH/USD",
            Symbol::BnbUsd => "BNB/USD",
            Symbol::BtcEth => "BTC/ETH",
            Symbol::BnbEth => "BNB/ETH",
        }
    }

    /// True when the price is computed from two direct feeds
    pub fn is_derived(&self) -> bool {
        derived_pair(*self).is_some()
    }

    /// True for pairs quoted in ETH rather than USD
    pub fn is_eth_quoted(&self) -> bool {
        self.as_str().ends_with("/ETH")
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        Symbol::ALL
            .into_iter()
            .find(|symbol| symbol.as_str() == normalized)
            .ok_or_else(|| FeedError::UnknownSymbol(s.to_string()))
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// A cross rate computed as `numerator / denominator`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedPair {
    pub symbol: Symbol,
    pub numerator: Symbol,
    pub denominator: Symbol,
}

/// Cross rates derived from the USD feeds
pub static DERIVED_PAIRS: [DerivedPair; 2] = [
    DerivedPair {
        symbol: Symbol::BtcEth,
        numerator: Symbol::BtcUsd,
        denominator: Symbol::EthUsd,
    },
    DerivedPair {
        symbol: Symbol::BnbEth,
        numerator: Symbol::BnbUsd,
        denominator: Symbol::EthUsd,
    },
];

/// Look up how a derived symbol is computed
pub fn derived_pair(symbol: Symbol) -> Option<&'static DerivedPair> {
    DERIVED_PAIRS.iter().find(|pair| pair.symbol == symbol)
}

impl DerivedPair {
    /// Compute the cross rate from two observations of the constituent feeds
    pub fn derive(&self, numerator: &PriceData, denominator: &PriceData) -> Result<PriceData, FeedError> {
        if denominator.price.is_zero() {
            return Err(FeedError::ZeroDenominator(self.denominator));
        }

        let price = numerator
            .price
            .checked_div(denominator.price)
            .ok_or(FeedError::InvalidValue {
                symbol: self.symbol,
                reason: "cross rate overflow".to_string(),
            })?;

        Ok(PriceData {
            symbol: self.symbol,
            price,
            timestamp: numerator.timestamp.max(denominator.timestamp),
            decimals: DERIVED_DECIMALS,
        })
    }
}

/// One observation of a symbol's price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceData {
    pub symbol: Symbol,
    pub price: Decimal,
    /// Oracle update time, serialized as epoch milliseconds
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Precision hint: oracle decimals for direct feeds, 18 for cross rates
    pub decimals: u32,
}

/// Price feed errors
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("No oracle address configured for {0}")]
    MissingAddress(Symbol),

    #[error("Negative oracle answer {answer} for {symbol}")]
    NegativeAnswer { symbol: Symbol, answer: i128 },

    #[error("Invalid value for {symbol}: {reason}")]
    InvalidValue { symbol: Symbol, reason: String },

    #[error("Zero denominator price for {0}")]
    ZeroDenominator(Symbol),

    #[error("Oracle read failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("Price source unavailable: {0}")]
    Unavailable(String),
}
