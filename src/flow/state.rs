//! Flow state machine.

use crate::flow::client::{FlowStep, ResourceId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Start,
    Created { id: ResourceId },
    Updated { id: ResourceId },
    /// Terminal. `delete_ok` records the fire-and-forget delete result.
    Completed { id: ResourceId, delete_ok: bool },
    /// Terminal. `id` is set when the create step had already succeeded.
    Failed {
        step: FlowStep,
        reason: String,
        id: Option<ResourceId>,
    },
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Completed { .. } | FlowState::Failed { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            FlowState::Start => "start",
            FlowState::Created { .. } => "created",
            FlowState::Updated { .. } => "updated",
            FlowState::Completed { .. } => "completed",
            FlowState::Failed { .. } => "failed",
        }
    }

    pub fn resource_id(&self) -> Option<&ResourceId> {
        match self {
            FlowState::Start => None,
            FlowState::Created { id } | FlowState::Updated { id } | FlowState::Completed { id, .. } => Some(id),
            FlowState::Failed { id, .. } => id.as_ref(),
        }
    }
}
