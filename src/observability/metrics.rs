//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wallet_connect_total` (counter): connect attempts by outcome
//! - `wallet_connect_duration_seconds` (histogram): connect latency
//! - `wallet_network_switch_total` (counter): switch/register results
//! - `wallet_price_fallback_total` (counter): default rate used, by reason
//! - `wallet_session_connected` (gauge): 1 while a session is connected
//!
//! Recording is a no-op until a recorder is installed, so library users
//! and tests pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished connect attempt.
pub fn record_connect(outcome: &'static str, started: Instant) {
    metrics::counter!("wallet_connect_total", "outcome" => outcome).increment(1);
    metrics::histogram!("wallet_connect_duration_seconds").record(started.elapsed().as_secs_f64());
}

/// Record a network switch or registration result.
pub fn record_network_switch(result: &'static str) {
    metrics::counter!("wallet_network_switch_total", "result" => result).increment(1);
}

/// Record that the default fiat rate was used.
pub fn record_price_fallback(reason: &'static str) {
    metrics::counter!("wallet_price_fallback_total", "reason" => reason).increment(1);
}

/// Track whether the session is connected.
pub fn record_session_connected(connected: bool) {
    metrics::gauge!("wallet_session_connected").set(if connected { 1.0 } else { 0.0 });
}
