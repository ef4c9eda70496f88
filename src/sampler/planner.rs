//! Per-tick planning.
//!
//! Turns the catalog, the active scenario list and a random source into
//! one `TickPlan` per scheduler tick. The planner lives on the scheduler
//! loop, so draws are consumed strictly in tick order.

use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::catalog::{CatalogError, FlowDefinition, ScenarioCatalog, ScenarioEntry};
use crate::sampler::random::RandomSource;
use crate::sampler::weighted::{Draw, WeightedSampler};

/// Ephemeral per-tick context handed to every sink call.
#[derive(Debug, Clone)]
pub struct TickContext {
    /// Monotonic tick number, starting at 0.
    pub sequence: u64,
    /// Links records that belong to one unit of work.
    pub correlation_id: Uuid,
    pub started_at: Instant,
}

impl TickContext {
    pub fn new(sequence: u64, started_at: Instant) -> Self {
        Self {
            sequence,
            correlation_id: Uuid::new_v4(),
            started_at,
        }
    }

    /// Child context for one flow instance: same tick, its own correlation id.
    pub fn for_flow(&self) -> Self {
        Self {
            sequence: self.sequence,
            correlation_id: Uuid::new_v4(),
            started_at: self.started_at,
        }
    }
}

/// What one tick must do.
#[derive(Debug, Clone)]
pub struct TickPlan {
    pub context: TickContext,
    pub entries: Vec<Arc<ScenarioEntry>>,
    pub flows: Vec<Arc<FlowDefinition>>,
    /// Every draw taken for this tick, in consumption order.
    pub draws: Vec<Draw>,
}

impl TickPlan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.flows.is_empty()
    }

    pub fn entry_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }
}

pub struct TickPlanner {
    catalog: Arc<ScenarioCatalog>,
    scenarios: Vec<String>,
    random: Box<dyn RandomSource>,
    sampler: WeightedSampler,
    next_sequence: u64,
}

impl TickPlanner {
    /// Build a planner over the given scenarios, in the given order.
    ///
    /// Repeated scenario names are sampled once.
    pub fn new(
        catalog: Arc<ScenarioCatalog>,
        scenarios: &[String],
        random: Box<dyn RandomSource>,
    ) -> Result<Self, CatalogError> {
        catalog.check_scenarios(scenarios)?;

        let mut unique: Vec<String> = Vec::with_capacity(scenarios.len());
        for name in scenarios {
            if !unique.contains(name) {
                unique.push(name.clone());
            }
        }

        Ok(Self {
            catalog,
            scenarios: unique,
            random,
            sampler: WeightedSampler::new(),
            next_sequence: 0,
        })
    }

    pub fn scenarios(&self) -> &[String] {
        &self.scenarios
    }

    /// Sample the next tick.
    pub fn plan(&mut self, started_at: Instant) -> TickPlan {
        let context = TickContext::new(self.next_sequence, started_at);
        self.next_sequence += 1;

        let mut entries = Vec::new();
        let mut flows = Vec::new();
        let mut draws = Vec::new();
        for scenario in &self.scenarios {
            entries.extend(self.sampler.sample_recorded(
                self.catalog.entries_for(scenario),
                self.random.as_mut(),
                &mut draws,
            ));
            flows.extend(self.sampler.sample_recorded(
                self.catalog.flows_for(scenario),
                self.random.as_mut(),
                &mut draws,
            ));
        }

        TickPlan {
            context,
            entries,
            flows,
            draws,
        }
    }
}
