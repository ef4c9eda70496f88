//! Correlated create → update → delete flows.
//!
//! # State Machine (state.rs)
//! ```text
//! Start ──create ok──▶ Created(id) ──update ok──▶ Updated(id) ──delete (any)──▶ Completed
//!   │                     │
//!   └──create err──▶ Failed ◀──update err──┘
//! ```
//!
//! # Design Decisions
//! - Steps run strictly in sequence; each waits for the previous result
//! - The identifier from the create step addresses update and delete
//! - A failed update leaves the created resource in place (no cleanup)
//! - Delete is fire-and-forget; its outcome is recorded but never fails the flow
//! - Flow instances share no state, across or within ticks

pub mod client;
pub mod executor;
pub mod state;

pub use client::{FlowStep, FlowStepError, HttpResourceClient, ResourceClient, ResourceId};
pub use executor::{FlowExecutor, FlowOutcome};
pub use state::FlowState;
