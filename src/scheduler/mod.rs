//! Tick scheduling subsystem.
//!
//! # Data Flow
//! ```text
//! interval timer (anchored to tick starts)
//!     → TickPlanner::plan (on the loop, draws stay ordered)
//!     → spawn tick task into JoinSet
//!         → TickPipeline::run_tick (emissions + flows)
//!
//! CancellationHandle::stop
//!     → broadcast cancel → loop stops scheduling
//!     → drain_on_cancel ? await in-flight ticks : abort them
//! ```
//!
//! # Design Decisions
//! - Ticks never wait on each other; a slow tick overlaps the next one
//! - Missed timer ticks are skipped, never bursted
//! - Stop is idempotent and never schedules another tick

pub mod handle;
pub mod ticker;

pub use handle::{CancellationHandle, SchedulerSummary};
pub use ticker::{ScheduleSettings, TickScheduler};
