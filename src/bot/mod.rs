//! Price bot module
//!
//! Schedules price updates and turns them into chat messages

mod scheduler;
mod types;

pub use scheduler::{plan_cycle, CycleOutcome, MessageCallback, PriceBot, UpdateTrigger};
pub use types::{
    ChatMessage, MessageKind, PriceBotConfig, PriceBotConfigUpdate, Trend, ALLOWED_INTERVALS,
    FAILURE_MESSAGE,
};
