//! On-chain price feed service
//!
//! Resolves symbols to direct aggregator reads or to cross rates computed
//! from two direct reads.

use super::{derived_pair, DerivedPair, FeedError, PriceData, PriceSource, Symbol};
use crate::config::ChainConfig;
use crate::oracle::{AddressBook, AggregatorContract, JsonRpcOracle, OracleReader, RoundData, RpcConfig};
use crate::telemetry::{record_feed_failure, record_latency, record_price, LatencyMetric};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures_util::future::join_all;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Price feed backed by Chainlink-style aggregators
pub struct PriceFeedService {
    reader: Arc<dyn OracleReader>,
    addresses: AddressBook,
    /// Resolved contract handles keyed by address
    contracts: RwLock<HashMap<String, Arc<AggregatorContract>>>,
}

impl PriceFeedService {
    /// Create a service over an arbitrary reader
    pub fn new(reader: Arc<dyn OracleReader>, addresses: AddressBook) -> Self {
        Self {
            reader,
            addresses,
            contracts: RwLock::new(HashMap::new()),
        }
    }

    /// Create a JSON-RPC backed service from chain configuration
    pub fn from_config(config: &ChainConfig) -> Result<Self, FeedError> {
        let network = config.network();
        let rpc = RpcConfig::new(config.rpc_url()).timeout(config.request_timeout());
        let reader = JsonRpcOracle::new(rpc)?;
        let addresses = AddressBook::for_network(network).with_overrides(&config.addresses);

        tracing::info!(%network, rpc_url = %reader.url(), "Price feed service configured");

        Ok(Self::new(Arc::new(reader), addresses))
    }

    /// Address table in use
    pub fn addresses(&self) -> &AddressBook {
        &self.addresses
    }

    /// Fetch one symbol; every failure is logged and reported as `None`
    pub async fn fetch(&self, symbol: Symbol) -> Option<PriceData> {
        match self.try_fetch(symbol).await {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!(%symbol, error = %e, "Failed to fetch price");
                None
            }
        }
    }

    /// Fetch by symbol name, returning `None` for unknown names
    pub async fn fetch_named(&self, name: &str) -> Option<PriceData> {
        match name.parse::<Symbol>() {
            Ok(symbol) => self.fetch(symbol).await,
            Err(e) => {
                tracing::warn!(symbol = name, error = %e, "Failed to fetch price");
                None
            }
        }
    }

    async fn try_fetch(&self, symbol: Symbol) -> Result<PriceData, FeedError> {
        match derived_pair(symbol) {
            Some(pair) => self.fetch_derived(pair).await,
            None => self.fetch_direct(symbol).await,
        }
    }

    async fn fetch_derived(&self, pair: &DerivedPair) -> Result<PriceData, FeedError> {
        let (numerator, denominator) = tokio::join!(
            self.fetch_direct(pair.numerator),
            self.fetch_direct(pair.denominator)
        );
        pair.derive(&numerator?, &denominator?)
    }

    async fn fetch_direct(&self, symbol: Symbol) -> Result<PriceData, FeedError> {
        let address = self
            .addresses
            .address(symbol)
            .ok_or(FeedError::MissingAddress(symbol))?;
        let contract = self.contract(address).await;

        let started = Instant::now();
        let result = contract.read().await;
        record_latency(LatencyMetric::OracleRead, started.elapsed());

        let (round, decimals) = result.inspect_err(|_| record_feed_failure(symbol))?;
        let data = price_from_round(symbol, round, decimals).inspect_err(|_| record_feed_failure(symbol))?;

        tracing::debug!(%symbol, price = %data.price, round_id = round.round_id, "Oracle price read");
        record_price(symbol, data.price);
        Ok(data)
    }

    /// Get or create the cached handle for an aggregator address
    async fn contract(&self, address: &str) -> Arc<AggregatorContract> {
        if let Some(contract) = self.contracts.read().await.get(address) {
            return Arc::clone(contract);
        }

        let mut contracts = self.contracts.write().await;
        Arc::clone(
            contracts
                .entry(address.to_string())
                .or_insert_with(|| Arc::new(AggregatorContract::new(address, Arc::clone(&self.reader)))),
        )
    }

    #[cfg(test)]
    async fn cached_contracts(&self) -> usize {
        self.contracts.read().await.len()
    }
}

#[async_trait]
impl PriceSource for PriceFeedService {
    /// Fetch the canonical symbol set, dropping anything that failed
    ///
    /// Direct feeds are read concurrently once; cross rates are computed from
    /// those same reads. A failed ETH/USD read therefore also drops every
    /// `/ETH` cross rate.
    async fn fetch_all(&self) -> Result<Vec<PriceData>, FeedError> {
        let reads = join_all(Symbol::DIRECT.into_iter().map(|symbol| async move {
            (symbol, self.fetch_direct(symbol).await)
        }))
        .await;

        let mut direct = HashMap::new();
        for (symbol, result) in reads {
            match result {
                Ok(data) => {
                    direct.insert(symbol, data);
                }
                Err(e) => tracing::warn!(%symbol, error = %e, "Failed to fetch price"),
            }
        }

        let prices: Vec<PriceData> = Symbol::ALL
            .into_iter()
            .filter_map(|symbol| match derived_pair(symbol) {
                None => direct.get(&symbol).cloned(),
                Some(pair) => {
                    let numerator = direct.get(&pair.numerator)?;
                    let denominator = direct.get(&pair.denominator)?;
                    pair.derive(numerator, denominator)
                        .inspect_err(|e| tracing::warn!(%symbol, error = %e, "Failed to derive price"))
                        .ok()
                }
            })
            .collect();

        tracing::debug!(count = prices.len(), "Fetched all prices");
        Ok(prices)
    }
}

/// Scale a raw aggregator answer into a price observation
fn price_from_round(symbol: Symbol, round: RoundData, decimals: u8) -> Result<PriceData, FeedError> {
    if round.answer < 0 {
        return Err(FeedError::NegativeAnswer {
            symbol,
            answer: round.answer,
        });
    }

    let price = Decimal::try_from_i128_with_scale(round.answer, u32::from(decimals)).map_err(|e| {
        FeedError::InvalidValue {
            symbol,
            reason: e.to_string(),
        }
    })?;

    let secs = i64::try_from(round.updated_at).map_err(|_| FeedError::InvalidValue {
        symbol,
        reason: format!("updatedAt {} out of range", round.updated_at),
    })?;
    let timestamp = Utc
        .timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| FeedError::InvalidValue {
            symbol,
            reason: format!("updatedAt {} out of range", secs),
        })?;

    Ok(PriceData {
        symbol,
        price,
        timestamp,
        decimals: u32::from(decimals),
    })
}
