//! End-to-end tests: fake chain -> feed service -> bot -> sink

use crate::support::seeded_chain;
use oracle_price_bot::bot::{ChatMessage, CycleOutcome, PriceBot, PriceBotConfig, PriceBotConfigUpdate, FAILURE_MESSAGE};
use oracle_price_bot::feed::{PriceFeedService, Symbol};
use oracle_price_bot::oracle::OracleReader;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct Harness {
    bot: PriceBot,
    chain: Arc<crate::support::FakeChain>,
    received: Arc<Mutex<Vec<ChatMessage>>>,
}

async fn harness(config: PriceBotConfig) -> Harness {
    let chain = Arc::new(seeded_chain());
    let reader: Arc<dyn OracleReader> = chain.clone();
    let service = Arc::new(PriceFeedService::new(reader, chain.book()));

    let bot = PriceBot::new(service, config);
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    bot.set_message_callback(move |msg| sink.lock().unwrap().push(msg))
        .await;

    Harness { bot, chain, received }
}

async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_manual_update_end_to_end() {
    let h = harness(PriceBotConfig {
        interval_minutes: 5,
        enabled: false,
        symbols: vec![Symbol::BtcEth, Symbol::BtcUsd],
    })
    .await;

    let outcome = h.bot.trigger_manual_update().await;
    assert!(matches!(outcome, CycleOutcome::Emitted(_)));

    let received = h.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    let msg = &received[0];
    let prices = msg.price_data.as_ref().unwrap();
    assert_eq!(prices.len(), 2);
    assert_eq!(prices[0].symbol, Symbol::BtcEth);

    let btc_eth = msg.content.find("BTC/ETH").unwrap();
    let btc_usd = msg.content.find("BTC/USD").unwrap();
    assert!(btc_eth < btc_usd);
}

#[tokio::test]
async fn test_chain_outage_on_manual_update() {
    let h = harness(PriceBotConfig::default()).await;
    for symbol in Symbol::DIRECT {
        h.chain.break_feed(symbol);
    }

    h.bot.trigger_manual_update().await;

    let received = h.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].content, FAILURE_MESSAGE);
    assert!(received[0].price_data.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_scheduled_updates_track_price_moves() {
    let h = harness(PriceBotConfig {
        interval_minutes: 5,
        enabled: true,
        symbols: vec![Symbol::BtcUsd],
    })
    .await;

    h.bot.start().await;
    assert_eq!(h.bot.get_previous_prices().await[&Symbol::BtcUsd], dec!(45123.45));

    h.chain.set(Symbol::BtcUsd, 4_600_000_000_000, 1_704_067_500);
    tokio::time::advance(Duration::from_secs(5 * 60)).await;
    settle().await;

    assert_eq!(h.received.lock().unwrap().len(), 2);
    assert_eq!(h.bot.get_previous_prices().await[&Symbol::BtcUsd], dec!(46000));

    h.bot.update_config(PriceBotConfigUpdate::enabled(false)).await;
    tokio::time::advance(Duration::from_secs(30 * 60)).await;
    settle().await;

    assert_eq!(h.received.lock().unwrap().len(), 2);
    assert!(!h.bot.is_running().await);
}
