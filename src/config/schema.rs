//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, Payload, Target};
use crate::catalog::builtin::{CRUD_FLOW, HTTP_ERRORS, LOG_VOLUME};

/// Root configuration for the traffic generator.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SynthConfig {
    /// Tick cadence and scenario selection.
    pub generator: GeneratorSettings,

    /// Where HTTP entries and flows are sent.
    pub targets: TargetConfig,

    /// Remote log shipping.
    pub shipper: ShipperConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,

    /// Demo target server.
    pub demo: DemoConfig,

    /// Extra entries registered after the built-in catalog.
    pub catalog: Vec<EntryConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Nominal interval between tick starts in milliseconds.
    pub interval_ms: u64,

    /// Scenario names to activate, sampled in this order.
    pub scenarios: Vec<String>,

    /// Seed for a reproducible random source.
    pub seed: Option<u64>,

    /// Finish in-flight ticks on stop instead of abandoning them.
    pub drain_on_cancel: bool,

    /// Upper bound on a drain in milliseconds; stragglers are aborted after it.
    pub drain_timeout_ms: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            interval_ms: 3000,
            scenarios: vec![LOG_VOLUME.to_string(), HTTP_ERRORS.to_string(), CRUD_FLOW.to_string()],
            seed: None,
            drain_on_cancel: true,
            drain_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Base URL relative targets resolve against.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3002".to_string(),
            request_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShipperConfig {
    pub enabled: bool,

    /// Collector endpoint receiving JSON records.
    pub endpoint: String,

    /// Tag attached to every shipped record.
    pub tag: String,
}

impl Default for ShipperConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://localhost:8006/logs".to_string(),
            tag: "traffic-synth".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    pub bind_address: String,

    /// Artificial latency of `GET /movies`.
    pub movies_delay_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3002".to_string(),
            movies_delay_ms: 1000,
        }
    }
}

/// A catalog entry declared in the config file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EntryConfig {
    pub scenario: String,
    pub id: String,
    pub category: Category,
    pub weight: f64,
    #[serde(default)]
    pub payload: Payload,
    #[serde(default)]
    pub target: Option<Target>,
}
