//! Price feed module
//!
//! Direct oracle prices, computed cross rates and message formatting

mod format;
mod service;
mod types;

pub use format::{format_price, format_prices, format_prices_in, NO_DATA_MESSAGE};
pub use service::PriceFeedService;
pub use types::{derived_pair, DerivedPair, FeedError, PriceData, Symbol, DERIVED_DECIMALS, DERIVED_PAIRS};

use async_trait::async_trait;

/// Trait for bulk price sources consumed by the bot
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch every available price; partial results are allowed
    async fn fetch_all(&self) -> Result<Vec<PriceData>, FeedError>;
}
