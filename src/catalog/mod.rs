//! Scenario catalog subsystem.
//!
//! # Data Flow
//! ```text
//! builtin.rs (demo scenarios) + config [[catalog]] entries
//!     → registry.rs (ordered, duplicate-checked registration)
//!     → Arc<ScenarioCatalog> (immutable after startup)
//!     → sampler (entries_for / flows_for per active scenario)
//! ```
//!
//! # Design Decisions
//! - Registration order is preserved; sampling replays depend on it
//! - Entry ids are unique across entries and flows
//! - Weights are independent fire probabilities, not a distribution

pub mod builtin;
pub mod entry;
pub mod registry;

pub use entry::{Category, FlowDefinition, HttpMethod, Payload, ScenarioEntry, Target, Weighted};
pub use registry::{CatalogError, ScenarioCatalog};
