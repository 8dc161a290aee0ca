//! Aggregator contract handle

use super::{OracleError, OracleReader, RoundData};
use std::sync::Arc;

/// A resolved aggregator contract bound to a reader
pub struct AggregatorContract {
    address: String,
    reader: Arc<dyn OracleReader>,
}

impl AggregatorContract {
    /// Bind an address to a reader
    pub fn new(address: impl Into<String>, reader: Arc<dyn OracleReader>) -> Self {
        Self {
            address: address.into(),
            reader,
        }
    }

    /// Contract address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Issue `latestRoundData()` and `decimals()` together
    pub async fn read(&self) -> Result<(RoundData, u8), OracleError> {
        tokio::try_join!(
            self.reader.latest_round_data(&self.address),
            self.reader.decimals(&self.address)
        )
    }
}
