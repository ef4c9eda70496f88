//! Weighted sampling subsystem.
//!
//! # Data Flow
//! ```text
//! Scheduler tick
//!     → planner.rs (walk active scenarios in order)
//!     → weighted.rs (one fresh draw per entry, fire if draw < weight)
//!     → random.rs (seeded, entropy or scripted source)
//!     → TickPlan { context, entries, flows, draws }
//! ```
//!
//! # Design Decisions
//! - Each entry is an independent Bernoulli trial; several or none may fire
//! - Sampling is pure given (entries, random source)
//! - Draws are consumed in catalog order so a seed replays exactly

pub mod planner;
pub mod random;
pub mod weighted;

pub use planner::{TickContext, TickPlan, TickPlanner};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use weighted::{Draw, WeightedSampler};
