//! Prometheus metrics

use crate::feed::Symbol;
use metrics_exporter_prometheus::PrometheusBuilder;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// One aggregator read (round data plus decimals)
    OracleRead,
}

/// Install the Prometheus recorder and serve `/metrics` on `port`
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(%addr, "Metrics exporter listening");
    Ok(())
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = match metric {
        LatencyMetric::OracleRead => "pricebot_oracle_read_latency_ms",
    };

    ::metrics::histogram!(metric_name).record(duration.as_secs_f64() * 1000.0);
}

/// Record the latest price seen for a symbol
pub fn record_price(symbol: Symbol, price: Decimal) {
    if let Some(value) = price.to_f64() {
        ::metrics::gauge!("pricebot_price", "symbol" => symbol.as_str()).set(value);
    }
}

/// Count a failed feed read
pub fn record_feed_failure(symbol: Symbol) {
    ::metrics::counter!("pricebot_feed_failures_total", "symbol" => symbol.as_str()).increment(1);
}

/// Count a completed update cycle by outcome
pub fn record_cycle(outcome: &'static str) {
    ::metrics::counter!("pricebot_update_cycles_total", "outcome" => outcome).increment(1);
}
