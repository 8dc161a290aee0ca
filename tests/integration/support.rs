//! Shared fixtures for integration tests

use async_trait::async_trait;
use oracle_price_bot::feed::Symbol;
use oracle_price_bot::oracle::{AddressBook, Network, OracleError, OracleReader, RoundData};
use std::collections::HashMap;
use std::sync::Mutex;

/// Aggregator stand-in whose answers can be changed between reads
pub struct FakeChain {
    book: AddressBook,
    feeds: Mutex<HashMap<String, Option<(i128, u64)>>>,
}

impl FakeChain {
    pub fn new() -> Self {
        Self {
            book: AddressBook::for_network(Network::Mainnet),
            feeds: Mutex::new(HashMap::new()),
        }
    }

    pub fn book(&self) -> AddressBook {
        self.book.clone()
    }

    /// Set a feed answer with 8 decimals
    pub fn set(&self, symbol: Symbol, answer: i128, updated_at: u64) {
        let address = self.book.address(symbol).unwrap().to_string();
        self.feeds.lock().unwrap().insert(address, Some((answer, updated_at)));
    }

    /// Make every read of a feed revert
    pub fn break_feed(&self, symbol: Symbol) {
        let address = self.book.address(symbol).unwrap().to_string();
        self.feeds.lock().unwrap().insert(address, None);
    }

    fn read(&self, address: &str) -> Result<(i128, u64), OracleError> {
        match self.feeds.lock().unwrap().get(address) {
            Some(Some(round)) => Ok(*round),
            Some(None) => Err(OracleError::Rpc {
                code: 3,
                message: "execution reverted".to_string(),
            }),
            None => Err(OracleError::EmptyResponse),
        }
    }
}

#[async_trait]
impl OracleReader for FakeChain {
    async fn latest_round_data(&self, address: &str) -> Result<RoundData, OracleError> {
        let (answer, updated_at) = self.read(address)?;
        Ok(RoundData {
            round_id: 1,
            answer,
            updated_at,
        })
    }

    async fn decimals(&self, address: &str) -> Result<u8, OracleError> {
        self.read(address).map(|_| 8)
    }
}

/// BTC 45,123.45 / ETH 2,500 / BNB 300 at 2024-01-01
pub fn seeded_chain() -> FakeChain {
    let chain = FakeChain::new();
    chain.set(Symbol::BtcUsd, 4_512_345_000_000, 1_704_067_200);
    chain.set(Symbol::EthUsd, 250_000_000_000, 1_704_067_230);
    chain.set(Symbol::BnbUsd, 30_000_000_000, 1_704_067_215);
    chain
}
