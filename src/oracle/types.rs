//! Oracle types and errors

use thiserror::Error;

/// Latest round as reported by an aggregator's `latestRoundData()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundData {
    /// Round identifier
    pub round_id: u128,
    /// Raw signed answer, scaled by the feed's decimals
    pub answer: i128,
    /// Unix timestamp (seconds) of the last update
    pub updated_at: u64,
}

/// Errors surfaced by the chain access layer
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("RPC transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Empty RPC response")]
    EmptyResponse,

    #[error("Malformed return data: {0}")]
    MalformedData(String),

    #[error("Value does not fit in {0}")]
    Overflow(&'static str),
}
