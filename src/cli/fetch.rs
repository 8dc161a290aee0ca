//! One-shot fetch commands

use crate::config::Config;
use crate::feed::{format_prices, PriceFeedService, PriceSource};
use clap::Args;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Use the testnet oracles
    #[arg(long)]
    pub testnet: bool,

    /// Print raw price data as JSON
    #[arg(long)]
    pub json: bool,
}

impl FetchArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let service = service(config, self.testnet)?;
        let prices = service.fetch_all().await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&prices)?);
        } else {
            println!("{}", format_prices(&prices));
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct PriceArgs {
    /// Symbol such as BTC/USD or BNB/ETH
    pub symbol: String,

    /// Use the testnet oracles
    #[arg(long)]
    pub testnet: bool,
}

impl PriceArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let service = service(config, self.testnet)?;

        match service.fetch_named(&self.symbol).await {
            Some(data) => println!("{}", format_prices(&[data])),
            None => anyhow::bail!("No price available for {}", self.symbol),
        }
        Ok(())
    }
}

fn service(config: &Config, testnet: bool) -> anyhow::Result<PriceFeedService> {
    let mut chain = config.chain.clone();
    chain.testnet |= testnet;
    Ok(PriceFeedService::from_config(&chain)?)
}
