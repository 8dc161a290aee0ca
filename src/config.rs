//! Configuration types for oracle-price-bot

use crate::bot::{PriceBotConfig, ALLOWED_INTERVALS};
use crate::feed::Symbol;
use crate::oracle::Network;
use crate::telemetry::LogFormat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub bot: PriceBotConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Chain access configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint; defaults to the public endpoint of the selected network
    #[serde(default)]
    pub rpc_url: Option<String>,

    /// Use the testnet address table
    #[serde(default)]
    pub testnet: bool,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Per-symbol aggregator address overrides
    #[serde(default)]
    pub addresses: HashMap<Symbol, String>,
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            testnet: false,
            request_timeout_secs: default_request_timeout_secs(),
            addresses: HashMap::new(),
        }
    }
}

impl ChainConfig {
    pub fn network(&self) -> Network {
        Network::from_testnet_flag(self.testnet)
    }

    /// Configured endpoint, or the network default
    pub fn rpc_url(&self) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| self.network().default_rpc_url().to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Serve Prometheus metrics on this port when set
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the settings surface would never produce
    pub fn validate(&self) -> anyhow::Result<()> {
        if !ALLOWED_INTERVALS.contains(&self.bot.interval_minutes) {
            anyhow::bail!(
                "interval_minutes must be one of {:?}, got {}",
                ALLOWED_INTERVALS,
                self.bot.interval_minutes
            );
        }
        if self.bot.symbols.is_empty() {
            anyhow::bail!("at least one symbol must be configured");
        }
        Ok(())
    }
}
