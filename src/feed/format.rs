//! Human-readable rendering of price observations

use super::{PriceData, Symbol};
use chrono::{DateTime, Local, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Display;

/// Text used when there is nothing to render
pub const NO_DATA_MESSAGE: &str = "📊 No price data available at the moment.";

const HEADER: &str = "📊 **Crypto Price Update**";

/// Render prices using the local timezone
pub fn format_prices(prices: &[PriceData]) -> String {
    format_prices_in(prices, Utc::now(), &Local)
}

/// Render prices with an explicit clock and timezone
pub fn format_prices_in<Tz>(prices: &[PriceData], now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if prices.is_empty() {
        return NO_DATA_MESSAGE.to_string();
    }

    let mut lines = Vec::with_capacity(prices.len() + 4);
    lines.push(HEADER.to_string());
    lines.push(String::new());

    for entry in prices {
        let local = entry.timestamp.with_timezone(tz);
        lines.push(format!(
            "{}: {} ({})",
            entry.symbol,
            format_price(entry.symbol, entry.price),
            local.format("%H:%M:%S")
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "_Last updated: {}_",
        now.with_timezone(tz).format("%Y-%m-%d %H:%M:%S")
    ));

    lines.join("\n")
}

/// Format a single price: `$1,234.56` for USD pairs, `$18.123456` for ETH pairs
pub fn format_price(symbol: Symbol, price: Decimal) -> String {
    let dp = if symbol.is_eth_quoted() { 6 } else { 2 };
    format!("${}", group_thousands(&fixed(price, dp)))
}

fn fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

/// Insert `,` separators into the integer part of a plain decimal string
fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}
