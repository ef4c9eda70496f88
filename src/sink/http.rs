//! HTTP call sink.
//!
//! # Responsibilities
//! - Resolve entry targets against the configured base URL
//! - Send the request with correlation headers
//! - Report the response status; any response counts as delivered
//!
//! # Design Decisions
//! - Synthetic 5xx endpoints are the point of the exercise, so a 5xx is
//!   a successful emission, not a sink failure
//! - Only transport errors and unusable targets fail

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::catalog::{Payload, ScenarioEntry, Target};
use crate::sampler::TickContext;
use crate::sink::{Delivery, EmissionSink, SinkError, SinkResult};

pub const CORRELATION_HEADER: &str = "x-correlation-id";
pub const TICK_HEADER: &str = "x-tick-sequence";

#[derive(Debug, Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSink {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("traffic-synth/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Absolute targets are used as-is; anything else joins the base URL.
    pub fn resolve(&self, target: &Target) -> Result<Url, SinkError> {
        let resolved = if target.path.starts_with("http://") || target.path.starts_with("https://") {
            Url::parse(&target.path)
        } else {
            self.base_url.join(&target.path)
        };
        resolved.map_err(|e| SinkError::InvalidTarget {
            target: target.path.clone(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl EmissionSink for HttpSink {
    async fn emit(&self, entry: &ScenarioEntry, ctx: &TickContext) -> SinkResult {
        let target = entry
            .target
            .as_ref()
            .ok_or_else(|| SinkError::MissingTarget(entry.id.clone()))?;
        let url = self.resolve(target)?;

        let mut request = self
            .client
            .request(target.method.as_reqwest(), url.clone())
            .header(CORRELATION_HEADER, ctx.correlation_id.to_string())
            .header(TICK_HEADER, ctx.sequence.to_string());

        request = match &entry.payload {
            Payload::Structured(value) => request.json(value),
            Payload::Text(text) if !text.is_empty() => request.body(text.clone()),
            Payload::Text(_) => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        let status = response.status();

        tracing::debug!(
            entry = %entry.id,
            tick = ctx.sequence,
            url = %url,
            status = %status,
            "HTTP entry emitted"
        );

        Ok(Delivery::with_status(status.as_u16()))
    }
}
