//! Run command implementation

use crate::bot::{ChatMessage, PriceBot, PriceBotConfigUpdate};
use crate::config::Config;
use crate::feed::{PriceFeedService, Symbol};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Update interval in minutes (1, 5, 10, 15, 30 or 60)
    #[arg(short, long)]
    pub interval: Option<u32>,

    /// Comma-separated symbols to report
    #[arg(short, long, value_delimiter = ',')]
    pub symbols: Vec<Symbol>,

    /// Use the testnet oracles
    #[arg(long)]
    pub testnet: bool,

    /// Print messages as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut config = config.clone();
        config.chain.testnet |= self.testnet;

        let update = PriceBotConfigUpdate {
            interval_minutes: self.interval,
            enabled: Some(true),
            symbols: (!self.symbols.is_empty()).then(|| self.symbols.clone()),
        };
        update.apply(&mut config.bot);
        config.validate()?;

        let service = Arc::new(PriceFeedService::from_config(&config.chain)?);
        let bot = PriceBot::new(service, config.bot.clone());

        let json = self.json;
        bot.set_message_callback(move |msg| print_message(&msg, json))
            .await;

        bot.start().await;
        tracing::info!("Price bot running, press Ctrl-C to stop");

        tokio::signal::ctrl_c().await?;
        bot.stop().await;
        Ok(())
    }
}

/// Stdout sink standing in for the chat timeline
fn print_message(msg: &ChatMessage, json: bool) {
    if json {
        match serde_json::to_string(msg) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!(error = %e, "Failed to serialize message"),
        }
    } else {
        println!("[{}] {}\n{}\n", msg.timestamp.format("%Y-%m-%d %H:%M:%S"), msg.id, msg.content);
    }
}
