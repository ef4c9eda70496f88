//! Console log sink.
//!
//! Writes synthetic records through `tracing` under the `synthetic`
//! target so they can be filtered apart from the generator's own logs.

use async_trait::async_trait;

use crate::catalog::{Category, ScenarioEntry};
use crate::sampler::TickContext;
use crate::sink::{Delivery, EmissionSink, SinkError, SinkResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl TracingLogSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmissionSink for TracingLogSink {
    async fn emit(&self, entry: &ScenarioEntry, ctx: &TickContext) -> SinkResult {
        let message = entry.payload.to_string();
        let correlation_id = ctx.correlation_id;
        let tick = ctx.sequence;

        match entry.category {
            Category::Info => tracing::info!(target: "synthetic", entry = %entry.id, tick, %correlation_id, "{}", message),
            Category::Warning => tracing::warn!(target: "synthetic", entry = %entry.id, tick, %correlation_id, "{}", message),
            Category::Error => tracing::error!(target: "synthetic", entry = %entry.id, tick, %correlation_id, "{}", message),
            Category::Debug => tracing::debug!(target: "synthetic", entry = %entry.id, tick, %correlation_id, "{}", message),
            Category::HttpCall => return Err(SinkError::Unroutable(entry.category.to_string())),
        }

        Ok(Delivery::logged())
    }
}
