//! Chain access module
//!
//! Read-only access to Chainlink-style aggregator contracts over JSON-RPC

mod addresses;
mod contract;
mod rpc;
mod types;

pub use addresses::{AddressBook, Network, MAINNET_RPC_URL, TESTNET_RPC_URL};
pub use contract::AggregatorContract;
pub use rpc::{JsonRpcOracle, RpcConfig};
pub use types::{OracleError, RoundData};

use async_trait::async_trait;

/// Trait for aggregator read access
#[async_trait]
pub trait OracleReader: Send + Sync {
    /// Call `latestRoundData()` on the aggregator at `address`
    async fn latest_round_data(&self, address: &str) -> Result<RoundData, OracleError>;
    /// Call `decimals()` on the aggregator at `address`
    async fn decimals(&self, address: &str) -> Result<u8, OracleError>;
}
