//! Integration tests for the price feed service

use crate::support::seeded_chain;
use oracle_price_bot::feed::{format_prices, PriceFeedService, PriceSource, Symbol, NO_DATA_MESSAGE};
use oracle_price_bot::oracle::OracleReader;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn service() -> (PriceFeedService, Arc<crate::support::FakeChain>) {
    let chain = Arc::new(seeded_chain());
    let reader: Arc<dyn OracleReader> = chain.clone();
    (PriceFeedService::new(reader, chain.book()), chain)
}

#[tokio::test]
async fn test_cross_rates_match_direct_feeds() {
    let (service, _) = service();

    let bnb = service.fetch(Symbol::BnbUsd).await.unwrap();
    let eth = service.fetch(Symbol::EthUsd).await.unwrap();
    let bnb_eth = service.fetch(Symbol::BnbEth).await.unwrap();

    assert_eq!(bnb_eth.price, dec!(0.12));
    assert_eq!(bnb_eth.price, bnb.price / eth.price);
    assert_eq!(bnb_eth.timestamp, eth.timestamp);
    assert_eq!(bnb_eth.decimals, 18);
}

#[tokio::test]
async fn test_fetch_all_with_eth_down_keeps_only_btc_and_bnb() {
    let (service, chain) = service();
    chain.break_feed(Symbol::EthUsd);

    let prices = service.fetch_all().await.unwrap();
    let symbols: Vec<Symbol> = prices.iter().map(|p| p.symbol).collect();
    assert_eq!(symbols, vec![Symbol::BtcUsd, Symbol::BnbUsd]);
}

#[tokio::test]
async fn test_format_of_fetched_prices() {
    let (service, _) = service();
    let prices = service.fetch_all().await.unwrap();

    let text = format_prices(&prices);
    assert!(text.contains("BTC/USD: $45,123.45"));
    assert!(text.contains("ETH/USD: $2,500.00"));
    assert!(text.contains("BTC/ETH: $18.049380"));
    assert!(text.contains("BNB/ETH: $0.120000"));
    assert!(text.contains("Last updated:"));

    assert_eq!(format_prices(&[]), NO_DATA_MESSAGE);
}
