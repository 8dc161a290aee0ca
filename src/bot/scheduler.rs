//! Timer-driven price bot
//!
//! Owns the recurring timer, the bot configuration and the last-seen price
//! per symbol. Timer ticks and manual triggers share one update cycle.

use super::{ChatMessage, PriceBotConfig, PriceBotConfigUpdate, Trend};
use crate::feed::{format_prices, FeedError, PriceData, PriceSource, Symbol};
use crate::telemetry::record_cycle;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

/// Receives every message the bot emits
pub type MessageCallback = Arc<dyn Fn(ChatMessage) + Send + Sync>;

/// What started an update cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTrigger {
    /// Timer tick, or the immediate cycle on start
    Scheduled,
    /// Explicit user request
    Manual,
}

/// Result of one update cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Price update message emitted
    Emitted(ChatMessage),
    /// Error message emitted
    Failed(ChatMessage),
    /// Nothing to show for the configured symbols
    Skipped,
}

impl CycleOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            CycleOutcome::Emitted(_) => "emitted",
            CycleOutcome::Failed(_) => "failed",
            CycleOutcome::Skipped => "skipped",
        }
    }

    pub fn message(&self) -> Option<&ChatMessage> {
        match self {
            CycleOutcome::Emitted(msg) | CycleOutcome::Failed(msg) => Some(msg),
            CycleOutcome::Skipped => None,
        }
    }
}

/// Decide what a cycle emits, given the fetch result and configured symbols
///
/// A fetch error always yields an error message. When nothing is left to
/// show, either because the fetch came back empty or because none of the
/// prices match `symbols`, manual triggers get an error message and
/// scheduled ones are skipped. Prices are ordered as configured.
pub fn plan_cycle(
    fetched: Result<Vec<PriceData>, FeedError>,
    symbols: &[Symbol],
    trigger: UpdateTrigger,
    now: DateTime<Utc>,
) -> CycleOutcome {
    let prices = match fetched {
        Ok(prices) => prices,
        Err(e) => {
            tracing::error!(error = %e, ?trigger, "Price update failed");
            return CycleOutcome::Failed(ChatMessage::bot_error(now));
        }
    };

    let fetched_count = prices.len();
    let mut filtered: Vec<PriceData> = prices
        .into_iter()
        .filter(|p| symbols.contains(&p.symbol))
        .collect();

    if filtered.is_empty() {
        return match trigger {
            UpdateTrigger::Manual => {
                tracing::warn!(fetched_count, ?symbols, "No prices to show for manual update");
                CycleOutcome::Failed(ChatMessage::bot_error(now))
            }
            UpdateTrigger::Scheduled => {
                tracing::info!(fetched_count, ?symbols, "No prices to show, skipping update");
                CycleOutcome::Skipped
            }
        };
    }

    filtered.sort_by_key(|p| symbols.iter().position(|s| *s == p.symbol));
    let content = format_prices(&filtered);
    CycleOutcome::Emitted(ChatMessage::bot_prices(content, filtered, now))
}

struct Inner {
    source: Arc<dyn PriceSource>,
    config: RwLock<PriceBotConfig>,
    previous_prices: RwLock<HashMap<Symbol, Decimal>>,
    callback: RwLock<Option<MessageCallback>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

/// Periodic price reporter
///
/// Cloning yields another handle to the same bot.
#[derive(Clone)]
pub struct PriceBot {
    inner: Arc<Inner>,
}

impl PriceBot {
    /// Create a stopped bot
    pub fn new(source: Arc<dyn PriceSource>, config: PriceBotConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                config: RwLock::new(config),
                previous_prices: RwLock::new(HashMap::new()),
                callback: RwLock::new(None),
                timer: Mutex::new(None),
            }),
        }
    }

    /// Register the sink for emitted messages, replacing any previous one
    pub async fn set_message_callback<F>(&self, callback: F)
    where
        F: Fn(ChatMessage) + Send + Sync + 'static,
    {
        *self.inner.callback.write().await = Some(Arc::new(callback));
    }

    /// Run one cycle now and arm the repeating timer
    ///
    /// Restarts if already running. Does nothing while disabled.
    pub async fn start(&self) {
        self.stop().await;

        {
            // Stored before the first cycle runs; stop() during it must see the timer
            let mut timer = self.inner.timer.lock().await;
            let config = self.get_config().await;
            if !config.enabled {
                tracing::info!("Price bot disabled, not starting");
                return;
            }

            // interval_at panics on a zero period
            let period = Duration::from_secs(u64::from(config.interval_minutes.max(1)) * 60);
            let handle = tokio::spawn(Self::run_timer(Arc::downgrade(&self.inner), period));
            if let Some(previous) = timer.replace(handle) {
                previous.abort();
            }

            tracing::info!(
                interval_minutes = config.interval_minutes,
                symbols = ?config.symbols,
                "Price bot started"
            );
        }

        self.run_update_cycle(UpdateTrigger::Scheduled).await;
    }

    /// Cancel the timer; cycles already in flight run to completion
    pub async fn stop(&self) {
        if let Some(handle) = self.inner.timer.lock().await.take() {
            handle.abort();
            tracing::info!("Price bot stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.inner.timer.lock().await.is_some()
    }

    /// Copy of the current configuration
    pub async fn get_config(&self) -> PriceBotConfig {
        self.inner.config.read().await.clone()
    }

    /// Copy of the last price seen per symbol
    pub async fn get_previous_prices(&self) -> HashMap<Symbol, Decimal> {
        self.inner.previous_prices.read().await.clone()
    }

    /// Trend of a fresh observation against the last one seen
    pub async fn trend(&self, price: &PriceData) -> Trend {
        let previous = self.inner.previous_prices.read().await.get(&price.symbol).copied();
        Trend::between(previous, price.price)
    }

    /// Merge a partial update and start or stop to match `enabled`
    ///
    /// A new interval only takes effect on the next start.
    pub async fn update_config(&self, update: PriceBotConfigUpdate) {
        let merged = {
            let mut config = self.inner.config.write().await;
            update.apply(&mut config);
            config.clone()
        };

        let running = self.is_running().await;
        if merged.enabled && !running {
            self.start().await;
        } else if !merged.enabled && running {
            self.stop().await;
        }
    }

    /// Run exactly one update cycle, whatever the running state
    pub async fn trigger_manual_update(&self) -> CycleOutcome {
        self.run_update_cycle(UpdateTrigger::Manual).await
    }

    async fn run_timer(inner: Weak<Inner>, period: Duration) {
        let mut ticker = interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            let Some(inner) = inner.upgrade() else {
                break;
            };
            let bot = PriceBot { inner };
            // Detached so stopping the timer never cancels a cycle mid-flight
            tokio::spawn(async move {
                bot.run_update_cycle(UpdateTrigger::Scheduled).await;
            });
        }
    }

    async fn run_update_cycle(&self, trigger: UpdateTrigger) -> CycleOutcome {
        let symbols = self.inner.config.read().await.symbols.clone();
        let fetched = self.inner.source.fetch_all().await;
        let outcome = plan_cycle(fetched, &symbols, trigger, Utc::now());

        self.apply_outcome(&outcome).await;
        record_cycle(outcome.label());
        outcome
    }

    async fn apply_outcome(&self, outcome: &CycleOutcome) {
        if let CycleOutcome::Emitted(msg) = outcome {
            let mut previous = self.inner.previous_prices.write().await;
            for price in msg.price_data.iter().flatten() {
                let trend = Trend::between(previous.get(&price.symbol).copied(), price.price);
                tracing::debug!(symbol = %price.symbol, price = %price.price, ?trend, "Price observed");
                previous.insert(price.symbol, price.price);
            }
        }

        let Some(msg) = outcome.message() else {
            return;
        };

        let callback = self.inner.callback.read().await.clone();
        match callback {
            Some(callback) => callback(msg.clone()),
            None => tracing::warn!(id = %msg.id, "No message callback registered, dropping message"),
        }
    }
}
