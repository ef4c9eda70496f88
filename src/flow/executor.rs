//! Drives one flow instance through its state machine.

use std::sync::Arc;

use crate::catalog::FlowDefinition;
use crate::flow::client::{FlowStep, ResourceClient};
use crate::flow::state::FlowState;
use crate::sampler::TickContext;

/// Result of one flow instance.
#[derive(Debug, Clone)]
pub struct FlowOutcome {
    pub flow_id: String,
    pub tick: u64,
    /// Terminal state.
    pub state: FlowState,
    /// Names of every state visited, from `start` to the terminal state.
    pub trace: Vec<&'static str>,
}

impl FlowOutcome {
    pub fn completed(&self) -> bool {
        matches!(self.state, FlowState::Completed { .. })
    }
}

#[derive(Clone)]
pub struct FlowExecutor {
    client: Arc<dyn ResourceClient>,
}

impl FlowExecutor {
    pub fn new(client: Arc<dyn ResourceClient>) -> Self {
        Self { client }
    }

    /// Run `flow` to a terminal state. Never fails; failures end in `FlowState::Failed`.
    pub async fn run(&self, flow: &FlowDefinition, ctx: &TickContext) -> FlowOutcome {
        let mut state = FlowState::Start;
        let mut trace = vec![state.name()];

        while !state.is_terminal() {
            state = self.step(flow, state, ctx).await;
            trace.push(state.name());
        }

        match &state {
            FlowState::Failed { step, reason, id } => tracing::warn!(
                flow = %flow.id,
                tick = ctx.sequence,
                correlation_id = %ctx.correlation_id,
                step = %step,
                resource_id = ?id.as_ref().map(|id| id.as_str()),
                error = %reason,
                "Flow failed"
            ),
            FlowState::Completed { id, delete_ok } => tracing::debug!(
                flow = %flow.id,
                tick = ctx.sequence,
                correlation_id = %ctx.correlation_id,
                resource_id = %id,
                delete_ok,
                "Flow completed"
            ),
            _ => {}
        }

        FlowOutcome {
            flow_id: flow.id.clone(),
            tick: ctx.sequence,
            state,
            trace,
        }
    }

    async fn step(&self, flow: &FlowDefinition, state: FlowState, ctx: &TickContext) -> FlowState {
        match state {
            FlowState::Start => match self.client.create(flow, ctx).await {
                Ok(id) => FlowState::Created { id },
                Err(e) => FlowState::Failed {
                    step: e.step(),
                    reason: e.to_string(),
                    id: None,
                },
            },
            FlowState::Created { id } => match self.client.update(flow, &id, ctx).await {
                Ok(()) => FlowState::Updated { id },
                Err(e) => FlowState::Failed {
                    step: FlowStep::Update,
                    reason: e.to_string(),
                    id: Some(id),
                },
            },
            FlowState::Updated { id } => {
                let delete_ok = match self.client.delete(flow, &id, ctx).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::debug!(flow = %flow.id, resource_id = %id, error = %e, "Delete failed, ignoring");
                        false
                    }
                };
                FlowState::Completed { id, delete_ok }
            }
            terminal => terminal,
        }
    }
}
