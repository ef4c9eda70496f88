//! Executes one planned tick.
//!
//! # Responsibilities
//! - Emit every fired entry concurrently through the sink
//! - Run every fired flow, concurrently with the emissions
//! - Contain each failure to its own entry or flow
//! - Report per-entry results and flow outcomes

use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Instant;

use crate::catalog::ScenarioEntry;
use crate::flow::{FlowExecutor, FlowOutcome, FlowState, ResourceClient};
use crate::observability::metrics;
use crate::sampler::{TickContext, TickPlan};
use crate::sink::{EmissionSink, SinkResult};

/// Result of emitting one entry.
#[derive(Debug, Clone)]
pub struct EmissionRecord {
    pub entry_id: String,
    pub result: SinkResult,
}

#[derive(Debug, Clone)]
pub struct TickReport {
    pub sequence: u64,
    pub emissions: Vec<EmissionRecord>,
    pub flows: Vec<FlowOutcome>,
}

impl TickReport {
    pub fn failures(&self) -> usize {
        self.emissions.iter().filter(|e| e.result.is_err()).count()
            + self.flows.iter().filter(|f| !f.completed()).count()
    }

    pub fn result_for(&self, entry_id: &str) -> Option<&SinkResult> {
        self.emissions
            .iter()
            .find(|e| e.entry_id == entry_id)
            .map(|e| &e.result)
    }
}

#[derive(Clone)]
pub struct TickPipeline {
    sink: Arc<dyn EmissionSink>,
    flows: FlowExecutor,
}

impl TickPipeline {
    pub fn new(sink: Arc<dyn EmissionSink>, resources: Arc<dyn ResourceClient>) -> Self {
        Self {
            sink,
            flows: FlowExecutor::new(resources),
        }
    }

    pub async fn run_tick(&self, plan: TickPlan) -> TickReport {
        let started = Instant::now();
        let ctx = plan.context;

        let emissions = join_all(plan.entries.iter().map(|entry| self.emit(entry, &ctx)));
        let flows = join_all(plan.flows.iter().map(|flow| {
            let flow_ctx = ctx.for_flow();
            async move { self.flows.run(flow, &flow_ctx).await }
        }));
        let (emissions, flows) = tokio::join!(emissions, flows);

        for outcome in &flows {
            metrics::record_flow(if matches!(outcome.state, FlowState::Completed { .. }) {
                "completed"
            } else {
                "failed"
            });
        }
        metrics::record_tick_duration(started.elapsed());

        let report = TickReport {
            sequence: ctx.sequence,
            emissions,
            flows,
        };

        tracing::debug!(
            tick = report.sequence,
            correlation_id = %ctx.correlation_id,
            emitted = report.emissions.len(),
            flows = report.flows.len(),
            failures = report.failures(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Tick finished"
        );

        report
    }

    async fn emit(&self, entry: &ScenarioEntry, ctx: &TickContext) -> EmissionRecord {
        let result = self.sink.emit(entry, ctx).await;
        metrics::record_emission(entry.category, result.is_ok());

        if let Err(e) = &result {
            tracing::warn!(
                entry = %entry.id,
                tick = ctx.sequence,
                correlation_id = %ctx.correlation_id,
                error = %e,
                "Emission failed"
            );
        }

        EmissionRecord {
            entry_id: entry.id.clone(),
            result,
        }
    }
}
