//! oracle-price-bot: chat price bot backed by on-chain price oracles
//!
//! This library provides the core components for:
//! - Read-only access to Chainlink-style aggregators over JSON-RPC
//! - Direct oracle prices and computed cross rates
//! - Human-readable price summaries
//! - A timer-driven bot that posts price updates to a chat sink
//! - Logging and Prometheus metrics

pub mod bot;
pub mod cli;
pub mod config;
pub mod feed;
pub mod oracle;
pub mod telemetry;
