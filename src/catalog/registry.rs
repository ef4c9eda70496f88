//! Ordered scenario registry.
//!
//! # Responsibilities
//! - Hold entries and flows grouped by scenario name
//! - Reject duplicate ids, out-of-range weights and untargeted HTTP
//!   entries at registration
//! - Preserve registration order for replayable sampling

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

use crate::catalog::entry::{FlowDefinition, ScenarioEntry};

/// Catalog misconfiguration. Fatal at startup.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("Duplicate entry id: {0}")]
    DuplicateEntryId(String),

    #[error("Entry {id} has weight {weight}, expected a value in (0, 1]")]
    InvalidWeight { id: String, weight: f64 },

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("HTTP entry {0} has no target")]
    MissingTarget(String),
}

#[derive(Debug, Default)]
struct Scenario {
    entries: Vec<Arc<ScenarioEntry>>,
    flows: Vec<Arc<FlowDefinition>>,
}

/// Registry of emittable events.
///
/// Mutated only while the process initialises; afterwards it is shared
/// behind an `Arc` and read concurrently.
#[derive(Debug, Default)]
pub struct ScenarioCatalog {
    scenarios: HashMap<String, Scenario>,
    /// Scenario names in first-registration order.
    order: Vec<String>,
    ids: HashSet<String>,
}

impl ScenarioCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry under a scenario.
    pub fn register(&mut self, scenario: &str, entry: ScenarioEntry) -> Result<(), CatalogError> {
        if !entry.category.is_log() && entry.target.is_none() {
            return Err(CatalogError::MissingTarget(entry.id));
        }
        self.claim(&entry.id, entry.weight)?;
        self.scenario_mut(scenario).entries.push(Arc::new(entry));
        Ok(())
    }

    /// Register a correlated flow under a scenario.
    pub fn register_flow(&mut self, scenario: &str, flow: FlowDefinition) -> Result<(), CatalogError> {
        self.claim(&flow.id, flow.weight)?;
        self.scenario_mut(scenario).flows.push(Arc::new(flow));
        Ok(())
    }

    /// Entries of one scenario in registration order. Empty for unknown names.
    pub fn entries_for(&self, scenario: &str) -> &[Arc<ScenarioEntry>] {
        self.scenarios
            .get(scenario)
            .map(|s| s.entries.as_slice())
            .unwrap_or(&[])
    }

    /// Flows of one scenario in registration order. Empty for unknown names.
    pub fn flows_for(&self, scenario: &str) -> &[Arc<FlowDefinition>] {
        self.scenarios
            .get(scenario)
            .map(|s| s.flows.as_slice())
            .unwrap_or(&[])
    }

    /// Every entry, scenario by scenario, in registration order.
    pub fn all_entries(&self) -> Vec<Arc<ScenarioEntry>> {
        self.order
            .iter()
            .flat_map(|name| self.entries_for(name).iter())
            .cloned()
            .collect()
    }

    pub fn has_scenario(&self, scenario: &str) -> bool {
        self.scenarios.contains_key(scenario)
    }

    pub fn scenario_names(&self) -> &[String] {
        &self.order
    }

    /// Fail on the first requested scenario that was never registered.
    pub fn check_scenarios<S: AsRef<str>>(&self, names: &[S]) -> Result<(), CatalogError> {
        match names.iter().find(|name| !self.has_scenario(name.as_ref())) {
            Some(missing) => Err(CatalogError::UnknownScenario(missing.as_ref().to_string())),
            None => Ok(()),
        }
    }

    fn claim(&mut self, id: &str, weight: f64) -> Result<(), CatalogError> {
        if !(weight > 0.0 && weight <= 1.0) {
            return Err(CatalogError::InvalidWeight {
                id: id.to_string(),
                weight,
            });
        }
        if !self.ids.insert(id.to_string()) {
            return Err(CatalogError::DuplicateEntryId(id.to_string()));
        }
        Ok(())
    }

    fn scenario_mut(&mut self, scenario: &str) -> &mut Scenario {
        if !self.scenarios.contains_key(scenario) {
            self.order.push(scenario.to_string());
        }
        self.scenarios.entry(scenario.to_string()).or_default()
    }
}
