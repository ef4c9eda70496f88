//! Metrics collection and exposition.
//!
//! # Metrics
//! - `synth_ticks_total` (counter): ticks started
//! - `synth_tick_duration_seconds` (histogram): wall time of one tick's work
//! - `synth_emissions_total` (counter): by category, outcome
//! - `synth_flows_total` (counter): by outcome (completed, failed)

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Duration;

use crate::catalog::Category;

/// Install the Prometheus recorder with an HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_tick() {
    counter!("synth_ticks_total").increment(1);
}

pub fn record_tick_duration(duration: Duration) {
    histogram!("synth_tick_duration_seconds").record(duration.as_secs_f64());
}

pub fn record_emission(category: Category, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("synth_emissions_total", "category" => category.as_str(), "outcome" => outcome).increment(1);
}

pub fn record_flow(outcome: &'static str) {
    counter!("synth_flows_total", "outcome" => outcome).increment(1);
}
