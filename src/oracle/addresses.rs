//! Aggregator address tables for BNB Smart Chain

use crate::feed::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default public RPC endpoint for mainnet
pub const MAINNET_RPC_URL: &str = "https://bsc-dataseed.binance.org/";

/// Default public RPC endpoint for testnet
pub const TESTNET_RPC_URL: &str = "https://data-seed-prebsc-1-s1.binance.org:8545/";

const MAINNET_FEEDS: [(Symbol, &str); 3] = [
    (Symbol::BtcUsd, "0x264990fbd0A4796A3E3d8E37C4d5F87a3aCa5Ebf"),
    (Symbol::EthUsd, "0x9ef1B8c0E4F7dc8bF5719Ea496883DC6401d5b2e"),
    (Symbol::BnbUsd, "0x0567F2323251f0Aab15c8dFb1967E4e8A7D42aeE"),
];

const TESTNET_FEEDS: [(Symbol, &str); 3] = [
    (Symbol::BtcUsd, "0x5741306c21795FdCBb9b265Ea0255F499DFe515C"),
    (Symbol::EthUsd, "0x143db3CEEfbdfe5631aDD3E50f7614B6ba708BA7"),
    (Symbol::BnbUsd, "0x2514895c72f50D8bd4B4F9b1110F0D6bD2c97526"),
];

/// Which chain the oracles live on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// Select the network from a testnet flag
    pub fn from_testnet_flag(testnet: bool) -> Self {
        if testnet {
            Network::Testnet
        } else {
            Network::Mainnet
        }
    }

    /// Public RPC endpoint used when none is configured
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_RPC_URL,
            Network::Testnet => TESTNET_RPC_URL,
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

/// Maps direct symbols to aggregator contract addresses
#[derive(Debug, Clone)]
pub struct AddressBook {
    network: Network,
    feeds: HashMap<Symbol, String>,
}

impl AddressBook {
    /// Built-in address table for a network
    pub fn for_network(network: Network) -> Self {
        let table = match network {
            Network::Mainnet => &MAINNET_FEEDS,
            Network::Testnet => &TESTNET_FEEDS,
        };

        Self {
            network,
            feeds: table
                .iter()
                .map(|(symbol, address)| (*symbol, address.to_string()))
                .collect(),
        }
    }

    /// Replace entries with user-supplied addresses; derived symbols are ignored
    pub fn with_overrides(mut self, overrides: &HashMap<Symbol, String>) -> Self {
        for (symbol, address) in overrides {
            if symbol.is_derived() {
                tracing::warn!(%symbol, "Ignoring address override for derived symbol");
                continue;
            }
            self.feeds.insert(*symbol, address.clone());
        }
        self
    }

    /// Network this table belongs to
    pub fn network(&self) -> Network {
        self.network
    }

    /// Aggregator address for a direct symbol
    pub fn address(&self, symbol: Symbol) -> Option<&str> {
        self.feeds.get(&symbol).map(String::as_str)
    }

    /// All entries in canonical symbol order
    pub fn entries(&self) -> Vec<(Symbol, &str)> {
        Symbol::DIRECT
            .iter()
            .filter_map(|s| self.address(*s).map(|a| (*s, a)))
            .collect()
    }
}
