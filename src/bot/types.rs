//! Bot configuration and chat message types

use crate::feed::{PriceData, Symbol};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Update intervals offered by the settings surface, in minutes
pub const ALLOWED_INTERVALS: [u32; 6] = [1, 5, 10, 15, 30, 60];

/// Text of the message emitted when an update cycle fails
pub const FAILURE_MESSAGE: &str = "❌ Failed to fetch price data. Please try again later.";

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PriceBotConfig {
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Symbols to report, in display order
    #[serde(default = "default_symbols")]
    pub symbols: Vec<Symbol>,
}

fn default_interval_minutes() -> u32 {
    5
}
fn default_enabled() -> bool {
    true
}
fn default_symbols() -> Vec<Symbol> {
    Symbol::DIRECT.to_vec()
}

impl Default for PriceBotConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            enabled: default_enabled(),
            symbols: default_symbols(),
        }
    }
}

/// Partial configuration update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PriceBotConfigUpdate {
    pub interval_minutes: Option<u32>,
    pub enabled: Option<bool>,
    pub symbols: Option<Vec<Symbol>>,
}

impl PriceBotConfigUpdate {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Default::default()
        }
    }

    pub fn interval_minutes(minutes: u32) -> Self {
        Self {
            interval_minutes: Some(minutes),
            ..Default::default()
        }
    }

    pub fn symbols(symbols: Vec<Symbol>) -> Self {
        Self {
            symbols: Some(symbols),
            ..Default::default()
        }
    }

    /// Merge into an existing configuration
    pub fn apply(self, config: &mut PriceBotConfig) {
        if let Some(minutes) = self.interval_minutes {
            config.interval_minutes = minutes;
        }
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
        if let Some(symbols) = self.symbols {
            let mut deduped = Vec::with_capacity(symbols.len());
            for symbol in symbols {
                if !deduped.contains(&symbol) {
                    deduped.push(symbol);
                }
            }
            config.symbols = deduped;
        }
    }
}

/// Who authored a chat entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Bot,
}

/// An entry pushed to the chat timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_data: Option<Vec<PriceData>>,
}

impl ChatMessage {
    /// Bot message carrying a price update
    pub fn bot_prices(content: impl Into<String>, prices: Vec<PriceData>, now: DateTime<Utc>) -> Self {
        Self {
            id: message_id(now),
            kind: MessageKind::Bot,
            content: content.into(),
            timestamp: now,
            price_data: Some(prices),
        }
    }

    /// Bot message reporting a failed update
    pub fn bot_error(now: DateTime<Utc>) -> Self {
        Self {
            id: message_id(now),
            kind: MessageKind::Bot,
            content: FAILURE_MESSAGE.to_string(),
            timestamp: now,
            price_data: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Bot && self.price_data.is_none()
    }
}

/// Emission time plus a random suffix so same-millisecond messages differ
fn message_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("price-bot-{}-{}", now.timestamp_millis(), &suffix[..8])
}

/// Direction of a price relative to the last one seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Unchanged,
    /// No previous observation
    New,
}

impl Trend {
    pub fn between(previous: Option<Decimal>, current: Decimal) -> Self {
        match previous {
            None => Trend::New,
            Some(prev) if current > prev => Trend::Up,
            Some(prev) if current < prev => Trend::Down,
            Some(_) => Trend::Unchanged,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "📈",
            Trend::Down => "📉",
            Trend::Unchanged => "➡️",
            Trend::New => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_config_default_is_valid() {
        let config = PriceBotConfig::default();
        assert!(ALLOWED_INTERVALS.contains(&config.interval_minutes));
        assert_eq!(config.symbols, vec![Symbol::BtcUsd, Symbol::EthUsd, Symbol::BnbUsd]);
    }

    #[test]
    fn test_update_merges_only_given_fields() {
        let mut config = PriceBotConfig::default();
        PriceBotConfigUpdate::interval_minutes(30).apply(&mut config);

        assert_eq!(config.interval_minutes, 30);
        assert!(config.enabled);
        assert_eq!(config.symbols.len(), 3);
    }

    #[test]
    fn test_update_symbols_keeps_order_and_dedups() {
        let mut config = PriceBotConfig::default();
        PriceBotConfigUpdate::symbols(vec![Symbol::BnbEth, Symbol::BtcUsd, Symbol::BnbEth]).apply(&mut config);
        assert_eq!(config.symbols, vec![Symbol::BnbEth, Symbol::BtcUsd]);
    }

    #[test]
    fn test_error_message_has_no_price_data() {
        let now = Utc.timestamp_opt(1_704_067_200, 0).unwrap();
        let msg = ChatMessage::bot_error(now);

        assert_eq!(msg.content, FAILURE_MESSAGE);
        assert!(msg.is_error());
        assert!(msg.id.starts_with("price-bot-1704067200000-"));
    }

    #[test]
    fn test_message_ids_are_unique() {
        let now = Utc::now();
        let a = ChatMessage::bot_error(now);
        let b = ChatMessage::bot_error(now);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_message_json_shape() {
        let now = Utc.timestamp_opt(1_704_067_200, 0).unwrap();
        let json = serde_json::to_value(ChatMessage::bot_error(now)).unwrap();

        assert_eq!(json["type"], "bot");
        assert_eq!(json["timestamp"], 1_704_067_200_000i64);
        assert!(json.get("priceData").is_none());

        let msg = ChatMessage::bot_prices("x", vec![], now);
        let json = serde_json::to_value(msg).unwrap();
        assert!(json["priceData"].is_array());
    }

    #[test]
    fn test_trend_between() {
        assert_eq!(Trend::between(None, dec!(1)), Trend::New);
        assert_eq!(Trend::between(Some(dec!(1)), dec!(2)), Trend::Up);
        assert_eq!(Trend::between(Some(dec!(2)), dec!(1)), Trend::Down);
        assert_eq!(Trend::between(Some(dec!(2.0)), dec!(2)), Trend::Unchanged);
        assert_eq!(Trend::Up.arrow(), "📈");
        assert_eq!(Trend::New.arrow(), "");
    }
}
